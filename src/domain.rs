mod availability;
mod form;
mod region;
mod reservation;
mod schedule;

use serde::{Deserialize, Serialize};
use snowflake::SnowflakeIdGenerator;
use std::{
    collections::VecDeque,
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
};

pub use self::availability::*;
pub use self::form::*;
pub use self::region::*;
pub use self::reservation::*;
pub use self::schedule::*;

pub trait Id:
    Copy
    + Eq
    + Deref<Target = Self::Inner>
    + From<Self::Inner>
    + Display
    + Debug
    + Serialize
    + for<'de> Deserialize<'de>
{
    type Inner: FromStr;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQueue<T> {
    queue: VecDeque<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
    pub fn push(&mut self, value: T) {
        self.queue.push_back(value)
    }
    pub fn pop_all(&mut self) -> Vec<T> {
        self.queue.drain(..).collect()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct IdGenerator(SnowflakeIdGenerator);

impl IdGenerator {
    pub fn new(gen: SnowflakeIdGenerator) -> Self {
        Self(gen)
    }

    pub fn generate<T>(&mut self) -> T
    where
        T: Id<Inner = u64>,
    {
        T::from(self.0.generate() as u64)
    }
}

impl From<SnowflakeIdGenerator> for IdGenerator {
    fn from(value: SnowflakeIdGenerator) -> Self {
        Self::new(value)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        SnowflakeIdGenerator::new(1, 1).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.pop_all(), vec![1, 2, 3]);
        assert!(queue.pop_all().is_empty());
    }

    #[test]
    fn test_id_generator_is_unique() {
        let mut gen = IdGenerator::default();
        let a: ReservationId = gen.generate();
        let b: ReservationId = gen.generate();
        assert_ne!(a, b);
    }
}
