//! Utility modules for data structures and terminal rendering.
//!
//! Provides:
//! - [`RingBuffer`] - Fixed-capacity circular buffer with O(1) push
//! - [`ansi`] - ANSI rendering of [`TerminalOutput`](crate::models::TerminalOutput) chunks

pub mod ansi;
mod ring_buffer;

pub use ring_buffer::RingBuffer;
