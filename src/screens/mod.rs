pub mod lottery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    None,
    /// Records changed; write them out.
    Save,
    Exit,
}
