use ride_backend::{Booking, BookingStatus, BookingType, PaymentStatus, Pricing};
use serde_json::json;

fn base_record() -> serde_json::Value {
    json!({
        "name": "Grace Hopper",
        "phone": "+1 555 0100",
        "email": "grace@example.com",
        "pickup": "JFK Terminal 4",
        "dropoff": "Midtown Manhattan",
        "date": "2026-12-01",
        "time": "09:15",
        "price": 120.0,
        "payment_status": "pending",
        "status": "pending"
    })
}

fn with(mut record: serde_json::Value, extra: serde_json::Value) -> serde_json::Value {
    let obj = record.as_object_mut().unwrap();
    for (k, v) in extra.as_object().unwrap() {
        obj.insert(k.clone(), v.clone());
    }
    record
}

#[test]
fn test_distance_booking_parses() {
    let record = with(base_record(), json!({"booking_type": "distance", "distance": 27.3}));
    let booking: Booking = serde_json::from_value(record).unwrap();

    assert_eq!(booking.booking_type, BookingType::Distance);
    assert_eq!(booking.distance, Some(27.3));
    assert_eq!(booking.hours, None);
    assert_eq!(booking.pricing().unwrap(), Pricing::Distance { distance: 27.3 });
}

#[test]
fn test_hourly_booking_parses() {
    let record = with(base_record(), json!({"booking_type": "hourly", "hours": 4}));
    let booking: Booking = serde_json::from_value(record).unwrap();

    assert_eq!(booking.booking_type, BookingType::Hourly);
    assert_eq!(booking.hours, Some(4.0));
    assert_eq!(booking.pricing().unwrap(), Pricing::Hourly { hours: 4.0 });
}

#[test]
fn test_mismatched_pricing_fields_still_parse() {
    // 解析時不檢查 booking_type 與 hours/distance 的對應
    let record = with(base_record(), json!({"booking_type": "distance", "hours": 2.0}));
    let booking: Booking = serde_json::from_value(record).unwrap();

    assert_eq!(booking.booking_type, BookingType::Distance);
    assert_eq!(booking.distance, None);
    assert!(booking.pricing().is_err());

    let record = with(base_record(), json!({"booking_type": "hourly"}));
    assert!(serde_json::from_value::<Booking>(record).is_ok());
}

#[test]
fn test_backend_row_with_nulls_and_timestamps() {
    let record = with(
        base_record(),
        json!({
            "id": "0b6f1a52-2f5e-4d3c-9a55-9d8e2c1f4a10",
            "user_id": null,
            "notes": null,
            "booking_type": "hourly",
            "hours": 2.5,
            "distance": null,
            "flight_number": "BA117",
            "payment_status": "paid",
            "payment_intent_id": "pi_3Nabc",
            "status": "confirmed",
            "created_at": "2026-10-19T10:00:00+00:00",
            "updated_at": "2026-10-19T10:05:00.5+00:00"
        }),
    );
    let booking: Booking = serde_json::from_value(record).unwrap();

    assert_eq!(booking.id.as_deref(), Some("0b6f1a52-2f5e-4d3c-9a55-9d8e2c1f4a10"));
    assert_eq!(booking.user_id, None);
    assert_eq!(booking.flight_number.as_deref(), Some("BA117"));
    assert_eq!(booking.payment_status, PaymentStatus::Paid);
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert!(booking.created_at_utc().is_some());
    assert!(booking.updated_at_utc() > booking.created_at_utc());

    let serialized = serde_json::to_value(&booking).unwrap();
    assert!(serialized.get("user_id").is_none());
    assert!(serialized.get("distance").is_none());
    assert_eq!(serialized["id"], json!("0b6f1a52-2f5e-4d3c-9a55-9d8e2c1f4a10"));
}

#[test]
fn test_enum_fields_reject_undeclared_values() {
    let record = with(
        base_record(),
        json!({"booking_type": "distance", "distance": 3.0, "payment_status": "refunded"}),
    );
    assert!(serde_json::from_value::<Booking>(record).is_err());

    let record = with(
        base_record(),
        json!({"booking_type": "distance", "distance": 3.0, "status": "archived"}),
    );
    assert!(serde_json::from_value::<Booking>(record).is_err());

    let record = with(base_record(), json!({"booking_type": "flat", "distance": 3.0}));
    assert!(serde_json::from_value::<Booking>(record).is_err());
}

#[test]
fn test_required_fields_must_be_present() {
    let mut record = with(base_record(), json!({"booking_type": "distance", "distance": 3.0}));
    record.as_object_mut().unwrap().remove("price");
    assert!(serde_json::from_value::<Booking>(record).is_err());
}
