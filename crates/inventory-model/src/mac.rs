/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

use std::str::FromStr;

use mac_address::MacAddress;

/// Canonicalize a MAC address string: whitespace is dropped, hyphen separators
/// become colons and letters are upper-cased, e.g. ` aa-bb-cc-dd-ee-ff ` becomes
/// `AA:BB:CC:DD:EE:FF`.
///
/// Empty input yields an empty string, which callers treat as "no MAC". No
/// validation of hex digits or octet count happens here; anything that is not
/// whitespace or a separator passes through upper-cased.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .map(|c| if c == '-' { ':' } else { c })
        .collect()
}

/// Whether an already canonical MAC is a proper 6-octet address.
pub fn is_well_formed(canonical: &str) -> bool {
    MacAddress::from_str(canonical).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_and_separators() {
        let expected = "AA:BB:CC:DD:EE:FF";
        for raw in [
            "aa:bb:cc:dd:ee:ff",
            "AA:BB:CC:DD:EE:FF",
            "aa-bb-cc-dd-ee-ff",
            "Aa-bB:cc-DD:ee-Ff",
            "  aa:bb:cc:dd:ee:ff\t",
            "aa : bb : cc : dd : ee : ff",
            " AA-BB-CC -DD-EE-FF\n",
        ] {
            assert_eq!(normalize(raw), expected, "input {raw:?}");
        }
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("\t\n"), "");
    }

    #[test]
    fn test_normalize_is_permissive() {
        assert_eq!(normalize("aabbccddeeff"), "AABBCCDDEEFF");
        assert_eq!(normalize("zz-top"), "ZZ:TOP");
        assert_eq!(normalize("aa:bb:cc"), "AA:BB:CC");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(" c8-08-e9-5d-df-f8 ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_is_well_formed() {
        assert!(is_well_formed("C8:08:E9:5D:DF:F8"));
        assert!(!is_well_formed("AA:BB:CC"));
        assert!(!is_well_formed("ZZ:BB:CC:DD:EE:FF"));
        assert!(!is_well_formed(""));
    }
}
