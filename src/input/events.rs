use crate::foundation::core::Point;

/// Raw input kinds a host can deliver to a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    MouseLeave,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
}

/// What a pointer event means for a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrokePhase {
    Start,
    Move,
    Exit,
}

impl PointerEventKind {
    pub const ALL: [PointerEventKind; 8] = [
        PointerEventKind::MouseDown,
        PointerEventKind::MouseMove,
        PointerEventKind::MouseUp,
        PointerEventKind::MouseLeave,
        PointerEventKind::TouchStart,
        PointerEventKind::TouchMove,
        PointerEventKind::TouchEnd,
        PointerEventKind::TouchCancel,
    ];

    pub fn phase(self) -> StrokePhase {
        match self {
            PointerEventKind::MouseDown | PointerEventKind::TouchStart => StrokePhase::Start,
            PointerEventKind::MouseMove | PointerEventKind::TouchMove => StrokePhase::Move,
            PointerEventKind::MouseUp
            | PointerEventKind::MouseLeave
            | PointerEventKind::TouchEnd
            | PointerEventKind::TouchCancel => StrokePhase::Exit,
        }
    }

    pub fn of_phase(phase: StrokePhase) -> Vec<PointerEventKind> {
        Self::ALL
            .into_iter()
            .filter(|k| k.phase() == phase)
            .collect()
    }
}

/// A pointer event in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub page: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            page: Point::new(x, y),
        }
    }
}
