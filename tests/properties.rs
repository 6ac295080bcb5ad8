//! Property-based tests using proptest.

use proptest::prelude::*;

use vaultpark::prelude::*;

fn arb_field() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9_-]{1,24}",
        "[^|]{1,16}",
    ]
}

fn arb_timestamp() -> impl Strategy<Value = i64> {
    prop_oneof![0_i64..=4_102_444_800_000, any::<i64>()]
}

fn arb_claims() -> impl Strategy<Value = TokenClaims> {
    (
        arb_field(),
        arb_field(),
        arb_timestamp(),
        proptest::option::of(arb_field()),
        proptest::option::of(arb_field()),
    )
        .prop_map(|(user_id, vehicle_number, timestamp_ms, gate, lot)| TokenClaims {
            user_id,
            vehicle_number,
            timestamp_ms,
            gate,
            lot,
        })
}

proptest! {
    #[test]
    fn compact_round_trip(user in arb_field(), vehicle in arb_field(), ts in arb_timestamp()) {
        let codec = TokenCodec::unkeyed(TokenFormat::Compact);
        let token = codec.encode(&TokenClaims::new(user.clone(), vehicle.clone(), ts))
            .map_err(|error| TestCaseError::fail(error.to_string()))?;

        prop_assert!(codec.verify_integrity(token.as_str()));
        prop_assert_eq!(codec.extract_field(token.as_str(), TokenField::UserId), Some(user.as_str()));
        prop_assert_eq!(
            codec.extract_field(token.as_str(), TokenField::VehicleNumber),
            Some(vehicle.as_str())
        );
        prop_assert_eq!(codec.extract_timestamp(token.as_str()), Some(ts));
    }

    #[test]
    fn extended_round_trip(claims in arb_claims()) {
        let codec = TokenCodec::unkeyed(TokenFormat::Extended);
        let token = codec.encode(&claims)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;

        prop_assert_eq!(codec.decode(token.as_str()), Ok(claims));
    }

    #[test]
    fn single_character_change_breaks_integrity(
        user in arb_field(),
        vehicle in arb_field(),
        ts in arb_timestamp(),
        position in any::<prop::sample::Index>(),
        replacement in any::<char>(),
    ) {
        let codec = TokenCodec::unkeyed(TokenFormat::Compact);
        let token = codec.encode(&TokenClaims::new(user, vehicle, ts))
            .map_err(|error| TestCaseError::fail(error.to_string()))?;

        let mut chars: Vec<char> = token.as_str().chars().collect();
        let index = position.index(chars.len());
        let slot = chars.get_mut(index).ok_or_else(|| TestCaseError::fail("index"))?;

        prop_assume!(*slot != replacement);
        *slot = replacement;

        let tampered: String = chars.into_iter().collect();

        prop_assert!(!codec.verify_integrity(&tampered));
    }

    #[test]
    fn wrong_field_count_is_rejected(fields in prop::collection::vec("[^|]{0,8}", 0..12)) {
        prop_assume!(fields.len() != 4);

        let codec = TokenCodec::unkeyed(TokenFormat::Compact);
        let mut parts = vec!["VAULTPARK".to_string()];
        parts.extend(fields);
        let token = parts.join("|");

        prop_assert!(!codec.validate_format(&token));
        prop_assert!(!codec.verify_integrity(&token));
        prop_assert_eq!(codec.extract_field(&token, TokenField::UserId), None);
        prop_assert_eq!(codec.extract_field(&token, TokenField::VehicleNumber), None);
        prop_assert_eq!(codec.extract_timestamp(&token), None);
    }

    #[test]
    fn other_prefixes_are_rejected(prefix in "[^|]{0,12}", claims in arb_claims()) {
        prop_assume!(prefix != "VAULTPARK");

        let codec = TokenCodec::unkeyed(TokenFormat::Compact);
        let claims = TokenClaims::new(claims.user_id, claims.vehicle_number, claims.timestamp_ms);
        let token = codec.encode(&claims)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        let swapped = token.as_str().replacen("VAULTPARK", &prefix, 1);

        prop_assert!(!codec.validate_format(&swapped));
    }

    #[test]
    fn arbitrary_strings_never_panic(input in ".*") {
        for format in [TokenFormat::Compact, TokenFormat::Extended] {
            let codec = TokenCodec::unkeyed(format);

            let _valid = codec.validate_format(&input);
            let _intact = codec.verify_integrity(&input);
            let _user = codec.extract_field(&input, TokenField::UserId);
            let _ts = codec.extract_timestamp(&input);
            let _claims = codec.decode(&input);
        }
    }
}
