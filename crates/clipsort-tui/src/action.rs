use clipsort_core::keyboard::KeyStroke;

/// Everything the user (or the clock) can ask the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NavigateBack,
    ToggleHelp,
    MoveUp,
    MoveDown,
    /// Enter: open the category picker, or confirm inside it.
    DrillIn,
    OpenPicker,
    NextPage,
    PrevPage,
    GrowPageSize,
    ShrinkPageSize,
    Retry,
    RecallPrevious,
    SwitchPane,
    SignOut,
    /// Unbound key on the classification screen, left to the shortcut
    /// dispatcher.
    Key(KeyStroke),

    // Authentication form
    TextInput(char),
    Backspace,
    NextField,
    PrevField,
    ToggleAuthMode,
    Submit,

    Tick,
    Resize(u16, u16),
    None,
}
