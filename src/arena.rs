// Copyright 2023 Divy Srivastava <dj.srivastava23@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A per-connection bump allocator. One `Arena` is created per accepted
//! connection and dropped (freeing everything it ever handed out) when
//! that connection's task ends.

use std::cell::UnsafeCell;

const DEFAULT_CHUNK_CAPACITY: usize = 4096;

pub struct Arena {
  chunks: UnsafeCell<Vec<Vec<u8>>>,
  chunk_capacity: usize,
}

impl Arena {
  pub fn new() -> Self {
    Self::with_chunk_capacity(DEFAULT_CHUNK_CAPACITY)
  }

  pub fn with_chunk_capacity(chunk_capacity: usize) -> Self {
    Arena {
      chunks: UnsafeCell::new(vec![Vec::with_capacity(chunk_capacity)]),
      chunk_capacity,
    }
  }

  /// Copies `data` into the arena and hands back a slice borrowed from
  /// it. The allocation lives as long as the arena itself.
  pub fn alloc_bytes(&self, data: &[u8]) -> &[u8] {
    // SAFETY: chunks are only ever pushed, never removed or shrunk, and
    // a chunk is only written to while it is `chunks.last()` — once a
    // later chunk is pushed, earlier chunks are never mutated again.
    // `Vec::extend_from_slice` on `chunks.last_mut()` therefore never
    // invalidates a slice handed out from an earlier call, so it is
    // sound to hand back a reference scoped to `&self` rather than the
    // `&mut self` this mutation would otherwise require.
    let chunks = unsafe { &mut *self.chunks.get() };

    let needs_new_chunk = data.len() > self.chunk_capacity
      || chunks.last().map_or(true, |c| c.len() + data.len() > c.capacity());
    if needs_new_chunk {
      chunks.push(Vec::with_capacity(data.len().max(self.chunk_capacity)));
    }

    let chunk = chunks.last_mut().expect("a chunk always exists after the check above");
    let start = chunk.len();
    chunk.extend_from_slice(data);
    &chunk[start..]
  }

  pub fn alloc_str(&self, s: &str) -> &str {
    let bytes = self.alloc_bytes(s.as_bytes());
    // SAFETY: `bytes` is a verbatim copy of `s`, which was valid UTF-8.
    unsafe { std::str::from_utf8_unchecked(bytes) }
  }
}

impl Default for Arena {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn returns_independently_usable_slices() {
    let arena = Arena::new();
    let a = arena.alloc_str("hello");
    let b = arena.alloc_str("world");
    assert_eq!(a, "hello");
    assert_eq!(b, "world");
  }

  #[test]
  fn grows_past_a_single_chunk() {
    let arena = Arena::with_chunk_capacity(8);
    let first = arena.alloc_bytes(&[1u8; 8]);
    let second = arena.alloc_bytes(&[2u8; 8]);
    assert_eq!(first, &[1u8; 8]);
    assert_eq!(second, &[2u8; 8]);
  }

  #[test]
  fn handles_an_allocation_larger_than_the_chunk_size() {
    let arena = Arena::with_chunk_capacity(4);
    let big = arena.alloc_bytes(&[9u8; 100]);
    assert_eq!(big.len(), 100);
  }
}
