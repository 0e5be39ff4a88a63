//! Output events from the session to the render/input adapter

/// Which slot dialog is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Save,
    Load,
}

impl DialogMode {
    pub fn title(self) -> &'static str {
        match self {
            DialogMode::Save => "Save: choose a slot",
            DialogMode::Load => "Load: choose a slot",
        }
    }

    /// Label of the per-slot primary button
    pub fn action_label(self) -> &'static str {
        match self {
            DialogMode::Save => "Save here",
            DialogMode::Load => "Load",
        }
    }
}

/// Short transient message for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Saved,
    Loaded,
    EmptySlot,
    /// Different image, different grid size, or damaged save
    Incompatible,
    NewShuffle,
    SaveFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::Saved => "Saved",
            Notice::Loaded => "Loaded",
            Notice::EmptySlot => "Empty slot",
            Notice::Incompatible => "Different image or empty save",
            Notice::NewShuffle => "New shuffle",
            Notice::SaveFailed => "Save failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Board, selection or status text changed
    Redraw,
    PreviewChanged(bool),
    Notice(Notice),
    DialogOpened(DialogMode),
    /// Slot list of the open dialog changed (rename/delete)
    SlotsChanged,
    DialogClosed,
}
