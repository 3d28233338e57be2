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

//! RFC 6455 §7.4 close status codes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseCode {
  Normal,
  Away,
  ProtocolError,
  Unsupported,
  Status,
  Abnormal,
  Invalid,
  Policy,
  Size,
  Extension,
  Error,
  Restart,
  Again,
  Reserved(u16),
}

impl From<u16> for CloseCode {
  fn from(code: u16) -> Self {
    match code {
      1000 => CloseCode::Normal,
      1001 => CloseCode::Away,
      1002 => CloseCode::ProtocolError,
      1003 => CloseCode::Unsupported,
      1005 => CloseCode::Status,
      1006 => CloseCode::Abnormal,
      1007 => CloseCode::Invalid,
      1008 => CloseCode::Policy,
      1009 => CloseCode::Size,
      1010 => CloseCode::Extension,
      1011 => CloseCode::Error,
      1012 => CloseCode::Restart,
      1013 => CloseCode::Again,
      other => CloseCode::Reserved(other),
    }
  }
}

impl From<CloseCode> for u16 {
  fn from(code: CloseCode) -> u16 {
    match code {
      CloseCode::Normal => 1000,
      CloseCode::Away => 1001,
      CloseCode::ProtocolError => 1002,
      CloseCode::Unsupported => 1003,
      CloseCode::Status => 1005,
      CloseCode::Abnormal => 1006,
      CloseCode::Invalid => 1007,
      CloseCode::Policy => 1008,
      CloseCode::Size => 1009,
      CloseCode::Extension => 1010,
      CloseCode::Error => 1011,
      CloseCode::Restart => 1012,
      CloseCode::Again => 1013,
      CloseCode::Reserved(other) => other,
    }
  }
}

impl CloseCode {
  /// Codes a peer is allowed to send on the wire. `Status`, `Abnormal`, and
  /// `Again` are reserved for internal/local use and must never appear in
  /// an actual Close fragment's payload (RFC 6455 §7.4.1).
  pub fn is_allowed(self) -> bool {
    !matches!(
      self,
      CloseCode::Status | CloseCode::Abnormal | CloseCode::Again | CloseCode::Reserved(0..=999)
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_known_codes() {
    assert_eq!(CloseCode::from(1000u16), CloseCode::Normal);
    assert_eq!(u16::from(CloseCode::Normal), 1000);
  }

  #[test]
  fn rejects_reserved_status_code() {
    assert!(!CloseCode::from(1005u16).is_allowed());
  }

  #[test]
  fn allows_policy_violation() {
    assert!(CloseCode::from(1008u16).is_allowed());
  }
}
