// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use crate::{ProbeError, SystemProbe, TierResult, FIELD_DELIMITER};

/// systemd writes this into /etc/machine-id before the first boot completes.
const UNINITIALIZED_MACHINE_ID: &str = "uninitialized";

/// Trim `raw` and fail if nothing is left.
pub fn non_empty(label: &str, raw: &str) -> TierResult {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ProbeError::Empty(label.to_string()));
    }
    Ok(value.to_string())
}

/// Reject values that firmware or images ship as stand-ins for a real id:
/// all-zero or all-`f` UUIDs and the systemd first-boot marker.
pub fn reject_placeholder(label: &str, value: String) -> TierResult {
    let hex: String = value.chars().filter(|c| *c != '-').collect();
    let placeholder = value.eq_ignore_ascii_case(UNINITIALIZED_MACHINE_ID)
        || (!hex.is_empty() && hex.chars().all(|c| c == '0'))
        || (!hex.is_empty() && hex.chars().all(|c| c.eq_ignore_ascii_case(&'f')));
    if placeholder {
        return Err(ProbeError::Placeholder(label.to_string()));
    }
    Ok(value)
}

pub fn or_placeholder(value: &str, placeholder: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Join the non-empty, trimmed parts with [`FIELD_DELIMITER`].
pub fn join_non_empty<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(FIELD_DELIMITER)
}

/// Find the first line containing `key` and return what follows `separator`
/// on that line, with surrounding whitespace and quotes removed.
///
/// Handles `Hardware UUID: XXXX` (system_profiler) as well as
/// `"IOPlatformUUID" = "XXXX"` (ioreg).
pub fn value_after(output: &str, key: &str, separator: char) -> TierResult {
    output
        .lines()
        .filter(|line| line.contains(key))
        .filter_map(|line| line.split_once(separator))
        .map(|(_, value)| value.trim().trim_matches('"').trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| ProbeError::Parse(key.to_string()))
}

/// First data row of a `wmic <class> get <property>` table. The first
/// non-empty row is the column header.
pub fn wmic_value(output: &str, property: &str) -> TierResult {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip_while(|line| line.eq_ignore_ascii_case(property))
        .map(str::to_string)
        .next()
        .ok_or_else(|| ProbeError::Parse(property.to_string()))
}

/// Value of `name` in `reg query` output, e.g.
/// `    MachineGuid    REG_SZ    0b5e...`.
pub fn reg_value(output: &str, name: &str) -> TierResult {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(n), Some(kind), Some(value))
                    if n.eq_ignore_ascii_case(name) && kind.starts_with("REG_") =>
                {
                    Some(value.to_string())
                }
                _ => None,
            }
        })
        .next()
        .ok_or_else(|| ProbeError::Parse(name.to_string()))
}

/// Build number from `cmd /c ver`, e.g.
/// `Microsoft Windows [Version 10.0.19045.3803]` gives `10.0.19045.3803`.
pub fn windows_version(output: &str) -> TierResult {
    output
        .split_once("[Version")
        .and_then(|(_, rest)| rest.split_once(']'))
        .map(|(version, _)| version.trim().to_string())
        .filter(|version| !version.is_empty())
        .ok_or_else(|| ProbeError::Parse("Windows version".into()))
}

/// Value of `key` in an os-release(5) file.
pub fn os_release_field(content: &str, key: &str) -> TierResult {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProbeError::Parse(key.to_string()))
}

/// Read a well-known identity file, rejecting empty and placeholder content.
pub async fn read_identity_file(probe: &dyn SystemProbe, path: &str) -> TierResult {
    let content = probe.read_file(path).await?;
    reject_placeholder(path, non_empty(path, &content)?)
}

/// Run a command and return its trimmed, non-empty stdout.
pub async fn command_output(probe: &dyn SystemProbe, program: &str, args: &[&str]) -> TierResult {
    let stdout = probe.run_command(program, args).await?;
    non_empty(program, &stdout)
}

pub async fn hostname(probe: &dyn SystemProbe) -> TierResult {
    command_output(probe, "hostname", &[]).await
}

/// `<sysname>|<release>` as reported by uname.
pub fn os_name_version(probe: &dyn SystemProbe) -> TierResult {
    let release = probe.os_release()?;
    let composite = join_non_empty([release.sysname.as_str(), release.release.as_str()]);
    non_empty("uname", &composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("uninitialized")]
    #[case("00000000-0000-0000-0000-000000000000")]
    #[case("FFFFFFFF-FFFF-FFFF-FFFF-FFFFFFFFFFFF")]
    #[case("ffffffffffffffffffffffffffffffff")]
    fn test_reject_placeholder(#[case] value: &str) {
        assert!(matches!(
            reject_placeholder("id", value.to_string()),
            Err(ProbeError::Placeholder(_))
        ));
    }

    #[rstest]
    #[case("4c4c4544-0042-3510-8052-b4c04f564432")]
    #[case("abc123")]
    fn test_accept_real_id(#[case] value: &str) {
        assert_eq!(reject_placeholder("id", value.to_string()).unwrap(), value);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("x", "  abc \n").unwrap(), "abc");
        assert!(matches!(non_empty("x", " \n\t"), Err(ProbeError::Empty(_))));
    }

    #[test]
    fn test_join_non_empty() {
        assert_eq!(join_non_empty(["a", " ", "b ", ""]), "a|b");
        assert_eq!(join_non_empty(["", ""]), "");
    }

    #[rstest]
    #[case(
        "Hardware:\n\n    Hardware Overview:\n\n      Model Name: MacBook Pro\n      Hardware UUID: 1A2B3C4D-0000-1111-2222-333344445555\n",
        "Hardware UUID",
        ':',
        "1A2B3C4D-0000-1111-2222-333344445555"
    )]
    #[case(
        "+-o J314sAP  <class IOPlatformExpertDevice>\n    {\n      \"IOPlatformSerialNumber\" = \"C02XXXX\"\n      \"IOPlatformUUID\" = \"5E6F7A8B-0000-1111-2222-333344445555\"\n    }\n",
        "IOPlatformUUID",
        '=',
        "5E6F7A8B-0000-1111-2222-333344445555"
    )]
    fn test_value_after(
        #[case] output: &str,
        #[case] key: &str,
        #[case] separator: char,
        #[case] expected: &str,
    ) {
        assert_eq!(value_after(output, key, separator).unwrap(), expected);
    }

    #[test]
    fn test_value_after_missing() {
        assert!(matches!(
            value_after("nothing here", "Hardware UUID", ':'),
            Err(ProbeError::Parse(_))
        ));
    }

    #[test]
    fn test_wmic_value() {
        let output = "UUID                                  \r\r\n4C4C4544-0042-3510-8052-B4C04F564432  \r\r\n\r\r\n";
        assert_eq!(
            wmic_value(output, "UUID").unwrap(),
            "4C4C4544-0042-3510-8052-B4C04F564432"
        );
        assert!(wmic_value("UUID\r\n\r\n", "UUID").is_err());
    }

    #[test]
    fn test_reg_value() {
        let output = "\r\nHKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\Cryptography\r\n    MachineGuid    REG_SZ    0b5e2c8a-1f3d-4e6a-9c7b-2d8e4f6a1b3c\r\n\r\n";
        assert_eq!(
            reg_value(output, "MachineGuid").unwrap(),
            "0b5e2c8a-1f3d-4e6a-9c7b-2d8e4f6a1b3c"
        );
        assert!(reg_value("ERROR: nothing", "MachineGuid").is_err());
    }

    #[rstest]
    #[case("\r\nMicrosoft Windows [Version 10.0.19045.3803]\r\n", "10.0.19045.3803")]
    #[case("Microsoft Windows [Version 6.1.7601]", "6.1.7601")]
    fn test_windows_version(#[case] output: &str, #[case] expected: &str) {
        assert_eq!(windows_version(output).unwrap(), expected);
    }

    #[test]
    fn test_os_release_field() {
        let content = "NAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\nID=ubuntu\n";
        assert_eq!(os_release_field(content, "VERSION_ID").unwrap(), "22.04");
        assert_eq!(os_release_field(content, "ID").unwrap(), "ubuntu");
        assert!(os_release_field(content, "BUILD_ID").is_err());
    }
}
