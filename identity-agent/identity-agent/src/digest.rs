// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use sha2::{Digest, Sha256};

/// Length of every hwid: the full SHA-256 digest as lowercase hex.
pub const HWID_LEN: usize = 64;

/// One-way digest of a composite identifier. The composite is hashed as
/// UTF-8 bytes without any normalization, so equal composites always give
/// equal hwids.
pub fn hwid_digest(composite: &str) -> String {
    hex::encode(Sha256::new().chain_update(composite.as_bytes()).finalize())
}

pub fn is_well_formed_hwid(hwid: &str) -> bool {
    hwid.len() == HWID_LEN && hwid.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
