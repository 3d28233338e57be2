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

//! In-place RFC 6455 §5.3 masking/unmasking. The operation is its own
//! inverse: applying it twice with the same key restores the original
//! bytes, so one function serves both directions.

pub fn apply_mask(payload: &mut [u8], mask_key: [u8; 4]) {
  for (i, byte) in payload.iter_mut().enumerate() {
    *byte ^= mask_key[i % 4];
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mask_then_unmask_is_identity() {
    let key = [0x37, 0xfa, 0x21, 0x3d];
    let mut payload = b"Hello".to_vec();
    let original = payload.clone();
    apply_mask(&mut payload, key);
    assert_ne!(payload, original);
    apply_mask(&mut payload, key);
    assert_eq!(payload, original);
  }

  #[test]
  fn matches_rfc6455_example_masked_frame() {
    // RFC 6455 §5.7: a masked Hello frame with key 37 fa 21 3d.
    let key = [0x37, 0xfa, 0x21, 0x3d];
    let mut payload = b"Hello".to_vec();
    apply_mask(&mut payload, key);
    assert_eq!(payload, vec![0x7f, 0x9f, 0x4d, 0x51, 0x58]);
  }
}
