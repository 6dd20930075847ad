// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! Projection of a [`DeviceIdentity`] onto outbound request headers.

use collector::UNKNOWN;
use log::warn;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::RequestBuilder;
use std::collections::BTreeMap;

use crate::identity::DeviceIdentity;

pub const HWID_HEADER: &str = "x-hwid";
pub const DEVICE_OS_HEADER: &str = "x-device-os";
pub const OS_VERSION_HEADER: &str = "x-ver-os";
pub const DEVICE_MODEL_HEADER: &str = "x-device-model";
pub const USER_AGENT_HEADER: &str = "user-agent";

/// The five identity headers, keyed by lowercase name.
pub fn to_headers(identity: &DeviceIdentity) -> BTreeMap<&'static str, String> {
    BTreeMap::from([
        (HWID_HEADER, identity.hwid.clone()),
        (DEVICE_OS_HEADER, identity.device_os.clone()),
        (OS_VERSION_HEADER, identity.os_version.clone()),
        (DEVICE_MODEL_HEADER, identity.device_model.clone()),
        (USER_AGENT_HEADER, identity.user_agent.clone()),
    ])
}

/// Same as [`to_headers`], as a header map ready for an HTTP client.
/// Control characters are dropped from values so that every field maps to
/// a valid header value.
pub fn to_header_map(identity: &DeviceIdentity) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(5);
    for (name, value) in to_headers(identity) {
        let name = if name == USER_AGENT_HEADER {
            USER_AGENT
        } else {
            HeaderName::from_static(name)
        };
        match header_value(&value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(e) => warn!("Dropping identity header {name}: {e}"),
        }
    }
    headers
}

/// Attach the identity headers to an outbound request.
pub fn attach_headers(builder: RequestBuilder, identity: &DeviceIdentity) -> RequestBuilder {
    builder.headers(to_header_map(identity))
}

fn header_value(value: &str) -> Result<HeaderValue, reqwest::header::InvalidHeaderValue> {
    let cleaned: String = value
        .chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect();
    let cleaned = match cleaned.trim() {
        "" => UNKNOWN,
        trimmed => trimmed,
    };
    // from_bytes keeps non-ASCII model names as opaque octets.
    HeaderValue::from_bytes(cleaned.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_metadata::StaticAppMetadata;
    use crate::identity::IdentitySource;
    use collector::Tier;

    fn identity(model: &str) -> DeviceIdentity {
        DeviceIdentity::new(
            crate::digest::hwid_digest("abc123"),
            "Linux",
            "22.04",
            model,
            &StaticAppMetadata::new("Trustiflux", "1.4.2"),
            IdentitySource::Tier {
                tier: Tier::DbusMachineId,
            },
        )
    }

    #[test]
    fn test_exactly_five_headers() {
        let headers = to_headers(&identity("Alibaba Cloud ECS"));
        let keys: Vec<&str> = headers.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                USER_AGENT_HEADER,
                DEVICE_MODEL_HEADER,
                DEVICE_OS_HEADER,
                HWID_HEADER,
                OS_VERSION_HEADER,
            ]
        );
        assert!(headers.values().all(|v| !v.is_empty()));
        assert_eq!(headers[HWID_HEADER], crate::digest::hwid_digest("abc123"));
        assert_eq!(
            headers[USER_AGENT_HEADER],
            "Trustiflux/1.4.2 (Linux 22.04; Alibaba Cloud ECS)"
        );
    }

    #[test]
    fn test_header_map() {
        let map = to_header_map(&identity("Alibaba Cloud ECS"));
        assert_eq!(map.len(), 5);
        assert_eq!(map.get(DEVICE_OS_HEADER).unwrap(), "Linux");
        assert_eq!(map.get(USER_AGENT).unwrap(), "Trustiflux/1.4.2 (Linux 22.04; Alibaba Cloud ECS)");
    }

    #[test]
    fn test_header_map_sanitizes_values() {
        let map = to_header_map(&identity("Model\r\nInjected: yes"));
        assert_eq!(map.len(), 5);
        assert_eq!(map.get(DEVICE_MODEL_HEADER).unwrap(), "ModelInjected: yes");

        let map = to_header_map(&identity("Légion 5 Pro"));
        assert_eq!(
            map.get(DEVICE_MODEL_HEADER).unwrap().as_bytes(),
            "Légion 5 Pro".as_bytes()
        );
    }

    #[test]
    fn test_attach_headers() {
        let request = attach_headers(
            reqwest::Client::new().get("http://127.0.0.1:8080/api/v1/devices"),
            &identity("KVM"),
        )
        .build()
        .unwrap();
        assert_eq!(request.headers().get(OS_VERSION_HEADER).unwrap(), "22.04");
        assert_eq!(request.headers().get(DEVICE_MODEL_HEADER).unwrap(), "KVM");
    }
}
