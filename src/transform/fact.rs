//! Fact dataset construction.

use std::collections::HashMap;

use tracing::info;

use crate::frame::Frame;
use crate::normalize::standardize_room_type;

use super::{require, Result};

/// The fixed output schema of the fact dataset.
pub const FACT_COLUMNS: [&str; 17] = [
    "id",
    "reservation_datetime",
    "check_in_date",
    "check_out_date",
    "status",
    "hotel_id",
    "booker_id",
    "total_room_price",
    "voucher_code",
    "total_discount",
    "room_type",
    "room_id",
    "guest_id",
    "payment_method_id",
    "amount",
    "status_payments",
    "payment_datetime",
];

/// Join reservations with their item, stay and payment context into the
/// denormalized fact dataset.
///
/// Joins are left-preserving: every reservation appears exactly once per
/// match, and columns from an unmatched side stay null. Stays are matched
/// on the reservation's own id - `reference_reservation_id` points at the
/// reservation, and a reservation has at most one stay record. The payment
/// join suffixes collisions with `_payments`, which is where the
/// `status_payments` column comes from.
pub fn build_fact_table(data: &HashMap<&str, Frame>) -> Result<Frame> {
    info!("transforming fact dataset");

    let reservations = require(data, "reservations")?;
    let reservation_items = require(data, "reservation_items")?;
    let stays = require(data, "stays")?;
    let payments = require(data, "payments")?;

    let with_items =
        reservations.left_join(reservation_items, "id", "reservation_id", "_items")?;
    let mut with_stays =
        with_items.left_join(stays, "id", "reference_reservation_id", "_stays")?;
    with_stays.apply("room_type", standardize_room_type)?;
    let joined = with_stays.left_join(payments, "id", "reservation_id", "_payments")?;

    let fact = joined.select(&FACT_COLUMNS)?;
    info!("fact dataset transformation complete");
    Ok(fact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Value;

    fn frame(columns: &[&str], rows: Vec<Vec<Value>>) -> Frame {
        let mut frame = Frame::new(columns.iter().map(|s| s.to_string()).collect());
        for row in rows {
            frame.push_row(row).unwrap();
        }
        frame
    }

    fn reservations() -> Frame {
        frame(
            &[
                "id",
                "reservation_datetime",
                "check_in_date",
                "check_out_date",
                "status",
                "hotel_id",
                "booker_id",
                "total_room_price",
                "voucher_code",
                "total_discount",
            ],
            vec![
                vec![
                    1001.into(),
                    "2024-06-01 12:00:00".into(),
                    "2024-06-15".into(),
                    "2024-06-20".into(),
                    "Booked".into(),
                    1.into(),
                    1.into(),
                    500.0.into(),
                    "SUMMER20".into(),
                    20.0.into(),
                ],
                vec![
                    1002.into(),
                    "2024-06-02 16:00:00".into(),
                    "2024-07-01".into(),
                    "2024-07-05".into(),
                    "Pending".into(),
                    2.into(),
                    2.into(),
                    600.0.into(),
                    "WINTER15".into(),
                    15.0.into(),
                ],
            ],
        )
    }

    fn reservation_items() -> Frame {
        frame(
            &[
                "id",
                "reservation_id",
                "reservation_datetime",
                "check_in_date",
                "check_out_date",
                "room_type",
                "total_room_price",
                "total_discount",
            ],
            vec![
                vec![
                    1.into(),
                    1001.into(),
                    "2024-06-01 12:00:00".into(),
                    "2024-06-15".into(),
                    "2024-06-20".into(),
                    "Single".into(),
                    300.0.into(),
                    10.0.into(),
                ],
                vec![
                    2.into(),
                    1002.into(),
                    "2024-06-02 16:00:00".into(),
                    "2024-07-01".into(),
                    "2024-07-05".into(),
                    "Suite".into(),
                    400.0.into(),
                    15.0.into(),
                ],
            ],
        )
    }

    fn stays() -> Frame {
        frame(
            &["id", "date", "reference_reservation_id", "room_id", "guest_id"],
            vec![
                vec![1.into(), "2024-06-16".into(), 1001.into(), 1.into(), 1.into()],
                vec![2.into(), "2024-07-02".into(), 1002.into(), 3.into(), 2.into()],
            ],
        )
    }

    fn payments() -> Frame {
        frame(
            &[
                "id",
                "reservation_id",
                "payment_method_id",
                "amount",
                "status",
                "created_datetime",
                "payment_datetime",
            ],
            vec![
                vec![
                    1.into(),
                    1001.into(),
                    1.into(),
                    100.0.into(),
                    "Paid".into(),
                    "2024-07-01 10:00:00".into(),
                    "2024-07-01 10:30:00".into(),
                ],
                vec![
                    2.into(),
                    1002.into(),
                    2.into(),
                    150.0.into(),
                    "Pending".into(),
                    "2024-07-02 14:00:00".into(),
                    Value::Null,
                ],
            ],
        )
    }

    fn fixture() -> HashMap<&'static str, Frame> {
        let mut data = HashMap::new();
        data.insert("reservations", reservations());
        data.insert("reservation_items", reservation_items());
        data.insert("stays", stays());
        data.insert("payments", payments());
        data
    }

    #[test]
    fn test_fact_table_shape_and_normalization() {
        let fact = build_fact_table(&fixture()).unwrap();

        assert_eq!(fact.len(), 2);
        assert_eq!(fact.columns(), &FACT_COLUMNS);

        let room_type = fact.column_index("room_type").unwrap();
        assert_eq!(fact.rows()[0][room_type], Value::Text("single".to_string()));
        assert_eq!(fact.rows()[1][room_type], Value::Text("suite".to_string()));
    }

    #[test]
    fn test_reservation_status_stays_apart_from_payment_status() {
        let fact = build_fact_table(&fixture()).unwrap();

        let status = fact.column_index("status").unwrap();
        let status_payments = fact.column_index("status_payments").unwrap();
        assert_eq!(fact.rows()[0][status], Value::Text("Booked".to_string()));
        assert_eq!(
            fact.rows()[0][status_payments],
            Value::Text("Paid".to_string())
        );
    }

    #[test]
    fn test_row_count_preserved_with_unmatched_context() {
        let mut data = fixture();
        // Second reservation loses its item, stay and payment.
        let items = frame(
            &[
                "id",
                "reservation_id",
                "reservation_datetime",
                "check_in_date",
                "check_out_date",
                "room_type",
                "total_room_price",
                "total_discount",
            ],
            vec![vec![
                1.into(),
                1001.into(),
                "2024-06-01 12:00:00".into(),
                "2024-06-15".into(),
                "2024-06-20".into(),
                "Single".into(),
                300.0.into(),
                10.0.into(),
            ]],
        );
        data.insert("reservation_items", items);
        data.insert("stays", frame(
            &["id", "date", "reference_reservation_id", "room_id", "guest_id"],
            vec![vec![1.into(), "2024-06-16".into(), 1001.into(), 1.into(), 1.into()]],
        ));
        data.insert("payments", frame(
            &[
                "id",
                "reservation_id",
                "payment_method_id",
                "amount",
                "status",
                "created_datetime",
                "payment_datetime",
            ],
            vec![],
        ));

        let fact = build_fact_table(&data).unwrap();
        assert_eq!(fact.len(), 2);

        let room_id = fact.column_index("room_id").unwrap();
        let amount = fact.column_index("amount").unwrap();
        assert_eq!(fact.rows()[1][room_id], Value::Null);
        assert_eq!(fact.rows()[0][amount], Value::Null);
        assert_eq!(fact.rows()[1][amount], Value::Null);
    }

    #[test]
    fn test_missing_input_aborts() {
        let mut data = fixture();
        data.remove("payments");
        let err = build_fact_table(&data).unwrap_err();
        assert!(matches!(
            err,
            super::super::TransformError::MissingDataset(name) if name == "payments"
        ));
    }
}
