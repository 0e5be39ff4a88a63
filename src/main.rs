//! Pebble entry point
//!
//! Browser: wires the canvas, buttons and slot dialog to the session.
//! Native: a line-based terminal driver over a JSON file store.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlImageElement, PointerEvent};

    use pebble::consts::*;
    use pebble::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use pebble::platform::SystemClock;
    use pebble::renderer::{CanvasRenderer, thumbnail};
    use pebble::session::{DialogMode, Host, SessionController, SessionEvent};
    use pebble::slots::SlotStore;
    use pebble::{Board, BootOptions, PuzzleConfig, PuzzleError};

    type Session = SessionController<Box<dyn KeyValueStore>, BrowserHost, SystemClock>;

    /// `confirm()` / `prompt()` dialogs and canvas thumbnails
    struct BrowserHost {
        window: web_sys::Window,
        image: HtmlImageElement,
    }

    impl Host for BrowserHost {
        fn confirm(&mut self, message: &str) -> bool {
            self.window.confirm_with_message(message).unwrap_or(false)
        }

        fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
            self.window
                .prompt_with_message_and_default(message, default)
                .ok()
                .flatten()
        }

        fn thumbnail(&mut self) -> Option<String> {
            thumbnail(&self.image)
        }
    }

    /// Page state shared by all callbacks
    struct Game {
        session: Session,
        renderer: CanvasRenderer,
        document: Document,
    }

    impl Game {
        fn redraw(&self) {
            self.renderer
                .draw(self.session.board(), self.session.is_preview());
            if let Some(stats) = self.document.get_element_by_id("stats") {
                stats.set_text_content(Some(&self.session.status_text()));
            }
        }

        fn show_preview_button(&self, preview: bool) {
            if let Some(btn) = self.document.get_element_by_id("previewBtn") {
                let _ = btn.class_list().toggle_with_force("active", preview);
                btn.set_text_content(Some(if preview { "Hide Preview" } else { "Preview" }));
            }
        }
    }

    /// Read one entry of the host page's `window.PEBBLE` object
    fn page_config(window: &web_sys::Window, name: &str) -> Option<JsValue> {
        let cfg = js_sys::Reflect::get(window, &JsValue::from_str("PEBBLE")).ok()?;
        if cfg.is_undefined() || cfg.is_null() {
            return None;
        }
        let value = js_sys::Reflect::get(&cfg, &JsValue::from_str(name)).ok()?;
        (!value.is_undefined() && !value.is_null()).then_some(value)
    }

    async fn load_image(url: &str) -> Result<HtmlImageElement, PuzzleError> {
        let image = HtmlImageElement::new().map_err(|_| PuzzleError::ImageLoad {
            url: url.to_string(),
        })?;
        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            image.set_onload(Some(&resolve));
            image.set_onerror(Some(&reject));
        });
        image.set_src(url);
        JsFuture::from(promise)
            .await
            .map_err(|_| PuzzleError::ImageLoad {
                url: url.to_string(),
            })?;
        image.set_onload(None);
        image.set_onerror(None);
        Ok(image)
    }

    fn toast(document: &Document, message: &str) {
        let el = match document.get_element_by_id("toast") {
            Some(el) => el,
            None => {
                let Ok(el) = document.create_element("div") else {
                    return;
                };
                el.set_id("toast");
                if let Some(body) = document.body() {
                    let _ = body.append_child(&el);
                }
                el
            }
        };
        el.set_text_content(Some(message));
        el.set_class_name("show");
        let hide = el.clone();
        let closure = Closure::once(move || hide.set_class_name(""));
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                TOAST_MS,
            );
        }
        closure.forget();
    }

    /// Handle everything the session queued since the last call
    fn pump(game: &Rc<RefCell<Game>>) {
        let events = game.borrow_mut().session.drain_events();
        let mut redraw = false;
        for event in events {
            match event {
                SessionEvent::Redraw => redraw = true,
                SessionEvent::PreviewChanged(on) => game.borrow().show_preview_button(on),
                SessionEvent::Notice(notice) => toast(&game.borrow().document, notice.message()),
                SessionEvent::DialogOpened(_) | SessionEvent::SlotsChanged => {
                    render_dialog(game);
                }
                SessionEvent::DialogClosed => set_modal_visible(&game.borrow().document, false),
            }
        }
        if redraw {
            game.borrow().redraw();
        }
    }

    fn set_modal_visible(document: &Document, visible: bool) {
        if let Some(modal) = document.get_element_by_id("modal") {
            let _ = modal.class_list().toggle_with_force("show", visible);
        }
    }

    fn on_click<F>(el: &Element, game: &Rc<RefCell<Game>>, action: F)
    where
        F: Fn(&mut Game) + 'static,
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&mut game.borrow_mut());
            pump(&game);
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn slot_button(document: &Document, label: &str, class: &str) -> Option<Element> {
        let btn = document.create_element("button").ok()?;
        btn.set_class_name(class);
        btn.set_text_content(Some(label));
        Some(btn)
    }

    /// Rebuild the slot list of the open dialog
    fn render_dialog(game: &Rc<RefCell<Game>>) {
        let (document, mode, slots) = {
            let g = game.borrow();
            let Some(mode) = g.session.dialog_mode() else {
                return;
            };
            let Some(slots) = g.session.dialog_slots() else {
                return;
            };
            (g.document.clone(), mode, slots)
        };

        if let Some(title) = document.get_element_by_id("modalTitle") {
            title.set_text_content(Some(mode.title()));
        }
        let Some(grid) = document.get_element_by_id("slotGrid") else {
            log::warn!("Slot dialog markup missing");
            return;
        };
        grid.set_inner_html("");

        for slot in slots {
            let Ok(el) = document.create_element("div") else {
                continue;
            };
            el.set_class_name("slot");

            if let Ok(name) = document.create_element("div") {
                name.set_class_name("name");
                name.set_text_content(Some(&slot.title));
                let _ = el.append_child(&name);
            }
            if let Ok(meta) = document.create_element("div") {
                meta.set_class_name("meta");
                meta.set_text_content(Some(&slot.meta));
                let _ = el.append_child(&meta);
            }
            if let Ok(actions) = document.create_element("div") {
                actions.set_class_name("actions");
                let index = slot.index;
                if let Some(btn) = slot_button(&document, mode.action_label(), "btn small") {
                    on_click(&btn, game, move |g| {
                        g.session.choose_slot(index);
                    });
                    let _ = actions.append_child(&btn);
                }
                if let Some(btn) = slot_button(&document, "Rename", "btn small") {
                    on_click(&btn, game, move |g| {
                        g.session.rename_slot(index);
                    });
                    let _ = actions.append_child(&btn);
                }
                if let Some(btn) = slot_button(&document, "Delete", "btn small warn") {
                    on_click(&btn, game, move |g| {
                        g.session.delete_slot(index);
                    });
                    let _ = actions.append_child(&btn);
                }
                let _ = el.append_child(&actions);
            }

            if let Some(html) = el.dyn_ref::<web_sys::HtmlElement>() {
                let style = html.style();
                let background = slot
                    .thumbnail
                    .as_deref()
                    .map(|t| format!("url({})", t))
                    .unwrap_or_default();
                let _ = style.set_property("background-image", &background);
                let _ = style.set_property("background-size", "cover");
                let _ = style.set_property("background-position", "center");
            }
            let _ = grid.append_child(&el);
        }
        set_modal_visible(&document, true);
    }

    fn setup_input_handlers(game: &Rc<RefCell<Game>>, canvas: &HtmlCanvasElement) {
        // Board taps
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                {
                    let mut g = game.borrow_mut();
                    let point = g
                        .renderer
                        .client_to_canvas(event.client_x() as f64, event.client_y() as f64);
                    let layout = g.renderer.layout();
                    g.session.tap_point(point, &layout);
                }
                pump(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let g = game.borrow();
                let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
                g.renderer.fit(dpr);
                g.redraw();
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        let document = game.borrow().document.clone();
        let buttons: [(&str, fn(&mut Game)); 4] = [
            ("saveBtn", |g| {
                g.session.open_dialog(DialogMode::Save);
            }),
            ("loadBtn", |g| {
                g.session.open_dialog(DialogMode::Load);
            }),
            ("resetBtn", |g| {
                g.session.request_reset();
            }),
            ("previewBtn", |g| g.session.toggle_preview()),
        ];
        for (id, action) in buttons {
            if let Some(btn) = document.get_element_by_id(id) {
                on_click(&btn, game, action);
            }
        }

        if let Some(btn) = document.get_element_by_id("modalClose") {
            on_click(&btn, game, |g| g.session.close_dialog());
        }
        // Clicking the backdrop (not its contents) closes the dialog
        if let Some(modal) = document.get_element_by_id("modal") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let on_backdrop = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .is_some_and(|el| el.id() == "modal");
                if on_backdrop {
                    game.borrow_mut().session.close_dialog();
                    pump(&game);
                }
            });
            let _ = modal.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pebble starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let rows = page_config(&window, "ROWS")
            .and_then(|v| v.as_f64())
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_ROWS);
        let cols = page_config(&window, "COLS")
            .and_then(|v| v.as_f64())
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_COLS);
        let image_url = page_config(&window, "IMG_URL")
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        let default_key = page_config(&window, "DEFAULT_KEY")
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| DEFAULT_KEY.to_string());
        let search = window.location().search().unwrap_or_default();
        let options = BootOptions::from_query(&search, &default_key);

        let config = match PuzzleConfig::new(rows, cols, image_url.clone()) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                let _ = window.alert_with_message(&e.to_string());
                return;
            }
        };

        let image = match load_image(&image_url).await {
            Ok(image) => image,
            Err(e) => {
                log::error!("{}", e);
                let _ = window.alert_with_message(&format!("{}. Put your photo there.", e));
                return;
            }
        };

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("board")
            .expect("no board canvas")
            .dyn_into()
            .expect("not a canvas");
        let renderer = match CanvasRenderer::new(canvas.clone(), image.clone(), rows, cols) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Canvas setup failed: {:?}", e);
                return;
            }
        };
        renderer.fit(window.device_pixel_ratio());

        let backend: Box<dyn KeyValueStore> = match LocalStorage::open() {
            Some(storage) => Box::new(storage),
            None => {
                log::warn!("LocalStorage unavailable, saves last for this page only");
                Box::new(MemoryStore::new())
            }
        };
        let host = BrowserHost {
            window: window.clone(),
            image,
        };
        let session = SessionController::new(
            Board::new(config, rand::random()),
            options.key.clone(),
            SlotStore::new(backend),
            host,
            SystemClock,
        );

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer,
            document,
        }));
        setup_input_handlers(&game, &canvas);

        game.borrow_mut()
            .session
            .start(options.autoload, options.manage);
        pump(&game);

        log::info!("Pebble running ({}x{}, key '{}')", rows, cols, options.key);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::{self, BufRead, Write};
    use std::path::{Path, PathBuf};

    use clap::Parser;

    use pebble::consts::*;
    use pebble::persistence::FileStore;
    use pebble::platform::SystemClock;
    use pebble::session::{DialogMode, Host, SessionController, SessionEvent, SlotOutcome};
    use pebble::slots::SlotStore;
    use pebble::{Board, PuzzleConfig, PuzzleError};

    #[derive(Debug, Parser)]
    #[command(name = "pebble", about = "Swap-tile image puzzle with three save slots")]
    pub struct Args {
        /// Grid rows
        #[arg(long, default_value_t = DEFAULT_ROWS)]
        rows: usize,
        /// Grid columns
        #[arg(long, default_value_t = DEFAULT_COLS)]
        cols: usize,
        /// Source image (local path or URL); saves only load for the same image
        #[arg(long, default_value = "pebble.jpg")]
        image: String,
        /// Puzzle key; each key has its own three slots
        #[arg(long, default_value = DEFAULT_KEY)]
        key: String,
        /// Restore the most recently updated slot
        #[arg(long)]
        autoload: bool,
        /// List the slots right away
        #[arg(long)]
        manage: bool,
        /// Slot storage file
        #[arg(long, default_value = "pebble-slots.json")]
        store: PathBuf,
        /// RNG seed for the shuffle
        #[arg(long)]
        seed: Option<u64>,
    }

    /// Confirmations and prompts on stdin/stdout
    struct StdioHost;

    fn read_line() -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    impl Host for StdioHost {
        fn confirm(&mut self, message: &str) -> bool {
            print!("{} [y/N] ", message);
            let _ = io::stdout().flush();
            read_line().is_some_and(|a| matches!(a.trim(), "y" | "Y" | "yes"))
        }

        /// Empty input takes the default; `-` or EOF cancels
        fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
            print!("{} [{}] ", message, default);
            let _ = io::stdout().flush();
            let answer = read_line()?;
            match answer.trim() {
                "-" => None,
                "" => Some(default.to_string()),
                other => Some(other.to_string()),
            }
        }

        fn thumbnail(&mut self) -> Option<String> {
            None
        }
    }

    type Session = SessionController<FileStore, StdioHost, SystemClock>;

    fn is_url(identity: &str) -> bool {
        identity.contains("://") || identity.starts_with("data:")
    }

    fn print_board(session: &Session) {
        let board = session.board();
        let cols = board.config().cols();
        let width = board.tile_count().to_string().len();
        if session.is_preview() {
            println!("(preview: solved image)");
        }
        for (cell, &tile) in board.tiles().iter().enumerate() {
            let shown = if session.is_preview() { cell } else { tile };
            let mark = if board.selection() == Some(cell) { '*' } else { ' ' };
            print!("{}{:>width$} ", mark, shown, width = width);
            if (cell + 1) % cols == 0 {
                println!();
            }
        }
        println!("{}", session.status_text());
    }

    fn print_slots(session: &mut Session) {
        for slot in session.open_dialog(DialogMode::Load) {
            println!("  [{}] {} - {}", slot.index + 1, slot.title, slot.meta);
        }
        session.close_dialog();
        session.drain_events();
    }

    fn print_events(session: &mut Session) {
        let mut redraw = false;
        for event in session.drain_events() {
            match event {
                SessionEvent::Redraw => redraw = true,
                SessionEvent::Notice(n) => println!(">> {}", n.message()),
                SessionEvent::PreviewChanged(on) => {
                    println!(">> Preview {}", if on { "on" } else { "off" })
                }
                SessionEvent::DialogOpened(_)
                | SessionEvent::SlotsChanged
                | SessionEvent::DialogClosed => {}
            }
        }
        if redraw {
            print_board(session);
        }
    }

    /// 1-based slot number argument
    fn slot_arg(arg: Option<&str>) -> Option<usize> {
        let n: usize = arg?.parse().ok()?;
        (1..=SLOT_COUNT).contains(&n).then(|| n - 1)
    }

    const HELP: &str = "commands: tap <cell> | save <1-3> | load <1-3> | rename <1-3> | \
                        delete <1-3> | slots | reset | preview | board | quit";

    pub fn run(args: Args) -> Result<(), PuzzleError> {
        if !is_url(&args.image) && !Path::new(&args.image).exists() {
            return Err(PuzzleError::ImageLoad { url: args.image });
        }
        let config = PuzzleConfig::new(args.rows, args.cols, args.image)?;
        let store = FileStore::open(&args.store);
        log::info!("Slots stored in {}", store.path().display());

        let seed = args.seed.unwrap_or_else(rand::random);
        let mut session = SessionController::new(
            Board::new(config, seed),
            args.key,
            SlotStore::new(store),
            StdioHost,
            SystemClock,
        );
        session.start(args.autoload, false);
        print_events(&mut session);
        if args.manage {
            print_slots(&mut session);
        }
        println!("{}", HELP);

        loop {
            print!("> ");
            let _ = io::stdout().flush();
            let Some(line) = read_line() else {
                break;
            };
            let mut words = line.split_whitespace();
            let Some(cmd) = words.next() else {
                continue;
            };
            let arg = words.next();
            match cmd {
                "tap" => match arg.and_then(|a| a.parse::<usize>().ok()) {
                    Some(cell) if cell < session.board().tile_count() => {
                        session.tap(cell);
                    }
                    _ => println!("cell must be 0..{}", session.board().tile_count()),
                },
                "save" | "load" | "rename" | "delete" => {
                    let Some(index) = slot_arg(arg) else {
                        println!("slot must be 1..{}", SLOT_COUNT);
                        continue;
                    };
                    let outcome = match cmd {
                        "save" => session.save_to_slot(index),
                        "load" => session.load_from_slot(index),
                        "rename" => session.rename_slot(index),
                        _ => session.delete_slot(index),
                    };
                    if outcome == SlotOutcome::Cancelled {
                        println!(">> Cancelled");
                    }
                }
                "slots" => print_slots(&mut session),
                "reset" => {
                    session.request_reset();
                }
                "preview" => session.toggle_preview(),
                "board" | "status" => print_board(&session),
                "quit" | "exit" => break,
                _ => println!("{}", HELP),
            }
            print_events(&mut session);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Pebble (native) starting...");

    let args = native::Args::parse();
    if let Err(e) = native::run(args) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
