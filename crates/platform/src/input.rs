use dom::NodeKey;

/// User interaction signals the selection observer cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    MouseUp,
    KeyUp,
    MouseOut,
}

impl InputKind {
    /// DOM event name, as used when registering with an events provider.
    pub fn name(self) -> &'static str {
        match self {
            InputKind::MouseUp => "mouseup",
            InputKind::KeyUp => "keyup",
            InputKind::MouseOut => "mouseout",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub target: NodeKey,
}

impl InputEvent {
    pub fn new(kind: InputKind, target: NodeKey) -> Self {
        Self { kind, target }
    }
}
