//! Homing lifecycle notifications
//!
//! The motion subsystem owns a [`HomingEvents`] registry and calls
//! [`HomingEvents::send_move_begin`] / [`HomingEvents::send_move_end`]
//! around every homing move. Subscribers keep the [`SubscriptionId`] they
//! were given and hand it back to [`HomingEvents::unsubscribe`] at teardown.

use heapless::Vec;

use crate::traits::HomingMove;

/// Handle returned by [`HomingEvents::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubscriptionId(u16);

/// Registry has no free slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegistryFull;

/// Receiver of homing move begin/end notifications
///
/// `T` is the toolhead handed to every callback so observers can flush and
/// dwell on the motion timeline.
pub trait HomingObserver<T: ?Sized> {
    /// Error type that aborts the homing operation
    type Error;

    /// Called before a homing move starts
    fn homing_move_begin(
        &mut self,
        toolhead: &mut T,
        hmove: &dyn HomingMove,
    ) -> Result<(), Self::Error>;

    /// Called after a homing move has stopped
    fn homing_move_end(
        &mut self,
        toolhead: &mut T,
        hmove: &dyn HomingMove,
    ) -> Result<(), Self::Error>;
}

/// Observer registry for homing moves
///
/// Observers are notified in subscription order. The first error stops
/// delivery and is returned to the caller, which aborts the homing
/// operation.
pub struct HomingEvents<O, const N: usize> {
    subscribers: Vec<(SubscriptionId, O), N>,
    next_id: u16,
}

impl<O, const N: usize> Default for HomingEvents<O, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, const N: usize> HomingEvents<O, N> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an observer
    pub fn subscribe(&mut self, observer: O) -> Result<SubscriptionId, RegistryFull> {
        let id = SubscriptionId(self.next_id);
        self.subscribers
            .push((id, observer))
            .map_err(|_| RegistryFull)?;
        self.next_id = self.next_id.wrapping_add(1);
        Ok(id)
    }

    /// Remove an observer and give it back
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Option<O> {
        let index = self.subscribers.iter().position(|(sid, _)| *sid == id)?;
        Some(self.subscribers.remove(index).1)
    }

    /// Access a subscribed observer (e.g. to dispatch a command to it)
    pub fn get_mut(&mut self, id: SubscriptionId) -> Option<&mut O> {
        self.subscribers
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, observer)| observer)
    }

    /// Access a subscribed observer
    pub fn get(&self, id: SubscriptionId) -> Option<&O> {
        self.subscribers
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, observer)| observer)
    }

    /// Number of subscribed observers
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Check if nobody is subscribed
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Notify every observer that a homing move is starting
    pub fn send_move_begin<T>(
        &mut self,
        toolhead: &mut T,
        hmove: &dyn HomingMove,
    ) -> Result<(), <O as HomingObserver<T>>::Error>
    where
        T: ?Sized,
        O: HomingObserver<T>,
    {
        for (_, observer) in self.subscribers.iter_mut() {
            observer.homing_move_begin(toolhead, hmove)?;
        }
        Ok(())
    }

    /// Notify every observer that a homing move has stopped
    pub fn send_move_end<T>(
        &mut self,
        toolhead: &mut T,
        hmove: &dyn HomingMove,
    ) -> Result<(), <O as HomingObserver<T>>::Error>
    where
        T: ?Sized,
        O: HomingObserver<T>,
    {
        for (_, observer) in self.subscribers.iter_mut() {
            observer.homing_move_end(toolhead, hmove)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::EndstopId;

    /// Counts notifications; fails begin when `fail` is set
    struct Counter {
        endstop: EndstopId,
        begins: u32,
        ends: u32,
        fail: bool,
    }

    impl Counter {
        fn new(endstop: u16) -> Self {
            Self {
                endstop: EndstopId(endstop),
                begins: 0,
                ends: 0,
                fail: false,
            }
        }
    }

    impl HomingObserver<u32> for Counter {
        type Error = EndstopId;

        fn homing_move_begin(
            &mut self,
            toolhead: &mut u32,
            hmove: &dyn HomingMove,
        ) -> Result<(), EndstopId> {
            if !hmove.has_endstop(self.endstop) {
                return Ok(());
            }
            if self.fail {
                return Err(self.endstop);
            }
            *toolhead += 1;
            self.begins += 1;
            Ok(())
        }

        fn homing_move_end(
            &mut self,
            _toolhead: &mut u32,
            hmove: &dyn HomingMove,
        ) -> Result<(), EndstopId> {
            if hmove.has_endstop(self.endstop) {
                self.ends += 1;
            }
            Ok(())
        }
    }

    #[test]
    fn test_dispatch_to_members_only() {
        let mut events: HomingEvents<Counter, 4> = HomingEvents::new();
        let a = events.subscribe(Counter::new(1)).unwrap();
        let b = events.subscribe(Counter::new(2)).unwrap();

        let mut toolhead = 0u32;
        let hmove = [EndstopId(1)];
        events.send_move_begin(&mut toolhead, &hmove).unwrap();
        events.send_move_end(&mut toolhead, &hmove).unwrap();

        assert_eq!(toolhead, 1);
        assert_eq!(events.get(a).unwrap().begins, 1);
        assert_eq!(events.get(a).unwrap().ends, 1);
        assert_eq!(events.get(b).unwrap().begins, 0);
    }

    #[test]
    fn test_first_error_stops_delivery() {
        let mut events: HomingEvents<Counter, 4> = HomingEvents::new();
        let a = events.subscribe(Counter::new(1)).unwrap();
        let b = events.subscribe(Counter::new(1)).unwrap();
        events.get_mut(a).unwrap().fail = true;

        let mut toolhead = 0u32;
        let result = events.send_move_begin(&mut toolhead, &[EndstopId(1)]);
        assert_eq!(result, Err(EndstopId(1)));
        assert_eq!(events.get(b).unwrap().begins, 0);
    }

    #[test]
    fn test_unsubscribe_releases_observer() {
        let mut events: HomingEvents<Counter, 2> = HomingEvents::new();
        let a = events.subscribe(Counter::new(1)).unwrap();
        let _b = events.subscribe(Counter::new(2)).unwrap();
        assert_eq!(events.subscribe(Counter::new(3)).err(), Some(RegistryFull));

        let released = events.unsubscribe(a).unwrap();
        assert_eq!(released.endstop, EndstopId(1));
        assert_eq!(events.len(), 1);
        assert!(events.unsubscribe(a).is_none());

        // Freed slot is reusable and ids are not recycled
        let c = events.subscribe(Counter::new(3)).unwrap();
        assert_ne!(c, a);
    }
}
