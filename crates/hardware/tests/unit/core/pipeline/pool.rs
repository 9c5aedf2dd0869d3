//! Instruction Pool Tests.
//!
//! The pool is a circular buffer: tickets are handed out and retired in the
//! same order, and a slot is reset every time it is reused.

use std::collections::VecDeque;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rvperf_core::core::pipeline::{InstructionPool, Ticket};
use rvperf_core::isa::Opcode;

#[test]
fn tickets_wrap_around() {
    let mut pool = InstructionPool::new(3);
    let tickets: Vec<_> = (0..3).map(|_| pool.allocate()).collect();
    assert_eq!(tickets.iter().map(|t| t.index()).collect::<Vec<_>>(), [0, 1, 2]);
    assert_eq!(pool.live(), 3);

    pool.free(tickets[0]);
    let reused = pool.allocate();

    assert_eq!(reused.index(), 0);
    assert_eq!(pool.live(), 3);
}

#[test]
fn reused_slot_is_reset() {
    let mut pool = InstructionPool::new(1);
    let first = pool.allocate();
    let _ = pool.get_mut(first).set_addr(0x400).set_opcode(Opcode::Ld);
    pool.free(first);

    let second = pool.allocate();
    assert_eq!(second, first);
    assert_eq!(pool.get(second).addr, 0);
    assert_eq!(pool.get(second).opcode, Opcode::Unknown);
    assert!(pool.get(second).is_used());
}

#[test]
fn bubble_reads_as_nop() {
    let pool = InstructionPool::new(2);
    let bubble = pool.bubble();

    assert!(bubble.is_bubble());
    assert_eq!(bubble, Ticket::BUBBLE);
    assert_eq!(pool.get(bubble).opcode, Opcode::Nop);
    assert_eq!(bubble.to_string(), "bubble");
}

#[test]
fn ticket_display() {
    let mut pool = InstructionPool::new(4);
    let _ = pool.allocate();
    assert_eq!(pool.allocate().to_string(), "#1");
}

#[test]
#[should_panic(expected = "instruction pool exhausted")]
fn allocating_past_capacity_panics() {
    let mut pool = InstructionPool::new(2);
    let _ = pool.allocate();
    let _ = pool.allocate();
    let _ = pool.allocate();
}

#[test]
#[should_panic(expected = "retired out of order")]
fn freeing_out_of_order_panics() {
    let mut pool = InstructionPool::new(4);
    let _first = pool.allocate();
    let second = pool.allocate();
    pool.free(second);
}

#[test]
#[should_panic(expected = "the bubble is never retired")]
fn freeing_the_bubble_panics() {
    let mut pool = InstructionPool::new(4);
    pool.free(Ticket::BUBBLE);
}

#[test]
#[should_panic(expected = "the bubble is immutable")]
fn bubble_cannot_be_written() {
    let mut pool = InstructionPool::new(4);
    let _ = pool.get_mut(Ticket::BUBBLE);
}

#[test]
#[should_panic(expected = "read after retirement")]
fn reading_a_retired_slot_panics() {
    let mut pool = InstructionPool::new(4);
    let ticket = pool.allocate();
    pool.free(ticket);
    let _ = pool.get(ticket);
}

proptest! {
    /// Any interleaving of allocations and in-order frees hands out tickets in
    /// circular order and never hands out a slot that is still in flight.
    #[test]
    fn allocation_is_fifo(capacity in 1usize..16, ops in proptest::collection::vec(any::<bool>(), 0..200)) {
        let mut pool = InstructionPool::new(capacity);
        let mut in_flight = VecDeque::new();
        let mut next = 0;

        for allocate in ops {
            if allocate && in_flight.len() < capacity {
                let ticket = pool.allocate();
                prop_assert_eq!(ticket.index(), next);
                prop_assert!(!in_flight.contains(&ticket));
                in_flight.push_back(ticket);
                next = (next + 1) % capacity;
            } else if let Some(oldest) = in_flight.pop_front() {
                pool.free(oldest);
            }
            prop_assert_eq!(pool.live(), in_flight.len());
        }
    }
}
