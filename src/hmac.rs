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

//! RFC 2104 HMAC over SHA-256, the latter consumed as a black-box
//! primitive from `sha2`.

use sha2::{Digest, Sha256};

const BLOCK_SIZE: usize = 64;

/// Computes `HMAC-SHA256(key, data)`. Keys longer than the block size are
/// first hashed down to 32 bytes, per RFC 2104 §2.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
  let mut block_key = [0u8; BLOCK_SIZE];
  if key.len() > BLOCK_SIZE {
    let digest = Sha256::digest(key);
    block_key[..digest.len()].copy_from_slice(&digest);
  } else {
    block_key[..key.len()].copy_from_slice(key);
  }

  let mut ipad = [0x36u8; BLOCK_SIZE];
  let mut opad = [0x5cu8; BLOCK_SIZE];
  for i in 0..BLOCK_SIZE {
    ipad[i] ^= block_key[i];
    opad[i] ^= block_key[i];
  }

  let mut inner = Sha256::new();
  inner.update(ipad);
  inner.update(data);
  let inner_digest = inner.finalize();

  let mut outer = Sha256::new();
  outer.update(opad);
  outer.update(inner_digest);
  outer.finalize().into()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
  }

  #[test]
  fn matches_rfc4231_test_case_1() {
    let key = [0x0bu8; 20];
    let mac = hmac_sha256(&key, b"Hi There");
    assert_eq!(
      to_hex(&mac),
      "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
    );
  }

  #[test]
  fn hashes_down_keys_longer_than_the_block_size() {
    let key = [0xaau8; 80];
    let mac = hmac_sha256(&key, b"anything");
    assert_eq!(mac.len(), 32);
  }
}
