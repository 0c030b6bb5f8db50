/// Property-based tests using proptest
/// Tests invariants of the filters and of the outbound payload
use proptest::prelude::*;
use solar_lead_relay::lead_models::{Lead, LeadAttributes, LeadMeta, NumericValue, SolarOwner};
use solar_lead_relay::lead_pipeline::{
    build_partner_payload, coerce_numeric_fields, normalize, sanitize_offer_type, screen,
    SkipReason, VALID_OFFER_TYPES,
};

fn base_lead(postcode: String, owner: SolarOwner) -> Lead {
    Lead {
        phone: "0681 123456".to_string(),
        email: None,
        first_name: None,
        last_name: None,
        street: None,
        housenumber: None,
        postcode,
        city: None,
        country: "DE".to_string(),
        product_name: "solar".to_string(),
        lead_attributes: LeadAttributes {
            solar_owner: owner,
            solar_energy_consumption: None,
            solar_monthly_electricity_bill: None,
            solar_offer_type: None,
            solar_property_type: None,
            solar_area: None,
        },
        meta_attributes: LeadMeta {
            landingpage_url: None,
            unique_id: None,
            utm_campaign: None,
            utm_source: None,
            ip: None,
            browser: None,
            optin: false,
        },
    }
}

fn any_owner() -> impl Strategy<Value = SolarOwner> {
    prop::sample::select(vec![SolarOwner::Yes, SolarOwner::No, SolarOwner::Commissioned])
}

fn any_numeric() -> impl Strategy<Value = Option<NumericValue>> {
    prop::option::of(prop_oneof![
        "\\PC*".prop_map(NumericValue::Text),
        "-?[0-9]{1,6}(\\.[0-9]{1,3})?".prop_map(NumericValue::Text),
        any::<f64>().prop_map(NumericValue::Number),
    ])
}

fn any_offer_type() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        "\\PC*",
        prop::sample::select(VALID_OFFER_TYPES.to_vec()).prop_map(str::to_string),
    ])
}

// Property: Region filter runs first
proptest! {
    #[test]
    fn postcodes_outside_region_always_skipped(postcode in "\\PC{0,8}", owner in any_owner()) {
        prop_assume!(!postcode.starts_with("66"));
        let lead = base_lead(postcode, owner);
        prop_assert_eq!(screen(&lead), Err(SkipReason::OutsideRegion));
    }

    #[test]
    fn region_leads_need_an_owner(suffix in "[0-9]{0,5}", owner in any_owner()) {
        let lead = base_lead(format!("66{}", suffix), owner);
        let expected = if owner == SolarOwner::Yes {
            Ok(())
        } else {
            Err(SkipReason::NotHomeowner)
        };
        prop_assert_eq!(screen(&lead), expected);
    }
}

// Property: Normalization never panics and only leaves allowed values
proptest! {
    #[test]
    fn offer_type_is_valid_or_absent(offer in any_offer_type()) {
        let mut attributes = base_lead("66111".to_string(), SolarOwner::Yes).lead_attributes;
        attributes.solar_offer_type = offer.clone();

        sanitize_offer_type(&mut attributes);

        match attributes.solar_offer_type {
            Some(kept) => {
                prop_assert!(VALID_OFFER_TYPES.contains(&kept.as_str()));
                prop_assert_eq!(Some(kept), offer);
            }
            None => {
                if let Some(original) = offer {
                    prop_assert!(!VALID_OFFER_TYPES.contains(&original.as_str()));
                }
            }
        }
    }

    #[test]
    fn numeric_fields_are_finite_numbers_or_absent(
        consumption in any_numeric(),
        bill in any_numeric(),
        area in any_numeric()
    ) {
        let mut attributes = base_lead("66111".to_string(), SolarOwner::Yes).lead_attributes;
        attributes.solar_energy_consumption = consumption;
        attributes.solar_monthly_electricity_bill = bill;
        attributes.solar_area = area;

        coerce_numeric_fields(&mut attributes);

        for (name, slot) in attributes.numeric_fields_mut() {
            match slot {
                None => {}
                Some(NumericValue::Number(n)) => prop_assert!(n.is_finite(), "{} not finite", name),
                Some(NumericValue::Text(t)) => prop_assert!(false, "{} left as text: {}", name, t),
            }
        }
    }

    #[test]
    fn formatted_numbers_survive_coercion(whole in 0u32..1_000_000, spaces in " {0,3}") {
        let mut attributes = base_lead("66111".to_string(), SolarOwner::Yes).lead_attributes;
        attributes.solar_area = Some(NumericValue::Text(format!("{}{}{}", spaces, whole, spaces)));

        coerce_numeric_fields(&mut attributes);

        prop_assert_eq!(attributes.solar_area, Some(NumericValue::Number(whole as f64)));
    }
}

// Property: Payload groups
proptest! {
    #[test]
    fn payload_groups_never_carry_nulls(
        email in prop::option::of("[a-z]{1,8}@[a-z]{1,8}\\.de"),
        city in prop::option::of("[A-Za-z]{1,12}"),
        offer in any_offer_type(),
        property_type in prop::option::of("\\PC{0,12}"),
        area in any_numeric(),
        utm_source in prop::option::of("[a-z]{0,10}"),
        ip in prop::option::of("[0-9.]{7,15}"),
        optin in any::<bool>()
    ) {
        let mut lead = base_lead("66111".to_string(), SolarOwner::Yes);
        lead.email = email;
        lead.city = city;
        lead.lead_attributes.solar_offer_type = offer;
        lead.lead_attributes.solar_property_type = property_type;
        lead.lead_attributes.solar_area = area;
        lead.meta_attributes.utm_source = utm_source;
        lead.meta_attributes.ip = ip;
        lead.meta_attributes.optin = optin;

        normalize(&mut lead.lead_attributes);
        let payload = build_partner_payload(lead).unwrap();

        prop_assert!(payload.lead_attributes.values().all(|v| !v.is_null()));
        prop_assert!(payload.meta_attributes.values().all(|v| !v.is_null()));
        prop_assert_eq!(
            payload.meta_attributes.get("optin").and_then(|v| v.as_bool()),
            Some(optin)
        );

        // Contact block keeps every key, null or not
        let wire = serde_json::to_value(&payload).unwrap();
        prop_assert_eq!(wire["lead"].as_object().unwrap().len(), 9);
        prop_assert_eq!(&wire["product"]["name"], "solar");
    }
}
