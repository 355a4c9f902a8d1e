//! Scoped input listeners.
//!
//! Registering a listener hands back a guard; dropping the guard deregisters it. A
//! surface bound through [`bind_surface`] stays wired exactly as long as the returned
//! [`SurfaceBindings`] lives.

pub mod events;

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::surface::DrawingSurface;

pub use events::{PointerEvent, PointerEventKind, StrokePhase};

type Listener = Rc<RefCell<dyn FnMut(&PointerEvent)>>;

struct Registration {
    id: u64,
    kinds: Vec<PointerEventKind>,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Registration>,
}

/// Host-side event source (the element a surface is rendered into).
#[derive(Clone, Default)]
pub struct EventTarget {
    registry: Rc<RefCell<Registry>>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "dropping the guard deregisters the listener"]
    pub fn add_listener(
        &self,
        kinds: &[PointerEventKind],
        listener: impl FnMut(&PointerEvent) + 'static,
    ) -> ListenerGuard {
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.entries.push(Registration {
            id,
            kinds: kinds.to_vec(),
            listener: Rc::new(RefCell::new(listener)),
        });
        ListenerGuard {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Delivers `event` to every listener registered for its kind, in registration order.
    pub fn dispatch(&self, event: &PointerEvent) {
        let matching: Vec<Listener> = self
            .registry
            .borrow()
            .entries
            .iter()
            .filter(|r| r.kinds.contains(&event.kind))
            .map(|r| r.listener.clone())
            .collect();

        for listener in matching {
            // A listener re-entering dispatch on itself is skipped rather than panicking.
            let Ok(mut f) = listener.try_borrow_mut() else {
                tracing::warn!(kind = ?event.kind, "re-entrant pointer event dropped");
                continue;
            };
            (&mut *f)(event);
        }
    }
}

/// Deregisters its listener on drop.
pub struct ListenerGuard {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().entries.retain(|r| r.id != self.id);
        }
    }
}

/// Start, move and exit listeners of one surface.
pub struct SurfaceBindings {
    _start: ListenerGuard,
    _move: ListenerGuard,
    _exit: ListenerGuard,
}

pub fn bind_surface(
    target: &EventTarget,
    surface: Rc<RefCell<DrawingSurface>>,
) -> SurfaceBindings {
    let s = surface.clone();
    let start = target.add_listener(
        &PointerEventKind::of_phase(StrokePhase::Start),
        move |e: &PointerEvent| s.borrow_mut().pointer_down(e.page),
    );

    let s = surface.clone();
    let mv = target.add_listener(
        &PointerEventKind::of_phase(StrokePhase::Move),
        move |e: &PointerEvent| s.borrow_mut().pointer_move(e.page),
    );

    let s = surface;
    let exit = target.add_listener(
        &PointerEventKind::of_phase(StrokePhase::Exit),
        move |e: &PointerEvent| match e.kind {
            PointerEventKind::MouseLeave => s.borrow_mut().pointer_leave(),
            _ => s.borrow_mut().pointer_up(),
        },
    );

    SurfaceBindings {
        _start: start,
        _move: mv,
        _exit: exit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PenState, SurfaceConfig};

    #[test]
    fn dropping_guard_deregisters() {
        let target = EventTarget::new();
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        let guard = target.add_listener(&[PointerEventKind::MouseDown], move |_| {
            *h.borrow_mut() += 1
        });

        target.dispatch(&PointerEvent::new(PointerEventKind::MouseDown, 0.0, 0.0));
        target.dispatch(&PointerEvent::new(PointerEventKind::MouseUp, 0.0, 0.0));
        assert_eq!(*hits.borrow(), 1);

        drop(guard);
        assert_eq!(target.listener_count(), 0);
        target.dispatch(&PointerEvent::new(PointerEventKind::MouseDown, 0.0, 0.0));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn guard_outliving_target_is_harmless() {
        let target = EventTarget::new();
        let guard = target.add_listener(&[PointerEventKind::MouseMove], |_| {});
        drop(target);
        drop(guard);
    }

    #[test]
    fn bound_surface_follows_events_until_unbound() {
        let target = EventTarget::new();
        let surface = Rc::new(RefCell::new(
            DrawingSurface::new(SurfaceConfig::default()).unwrap(),
        ));

        let bindings = bind_surface(&target, surface.clone());
        assert_eq!(target.listener_count(), 3);

        target.dispatch(&PointerEvent::new(PointerEventKind::TouchStart, 10.0, 10.0));
        assert!(surface.borrow().is_drawing());
        target.dispatch(&PointerEvent::new(PointerEventKind::TouchCancel, 10.0, 10.0));
        assert_eq!(surface.borrow().pen(), PenState::Idle);

        drop(bindings);
        assert_eq!(target.listener_count(), 0);
        target.dispatch(&PointerEvent::new(PointerEventKind::MouseDown, 10.0, 10.0));
        assert_eq!(surface.borrow().pen(), PenState::Idle);
    }
}
