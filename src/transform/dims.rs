//! Dimension dataset construction.

use std::collections::HashMap;

use tracing::info;

use crate::frame::Frame;
use crate::normalize::format_phone_number;

use super::{require, Result};

/// Columns kept for the users dimension.
pub const USER_COLUMNS: [&str; 6] = [
    "id",
    "name",
    "birth_date",
    "gender",
    "email",
    "phoneNumber",
];

/// Build the seven dimension datasets, warehouse-facing name first.
///
/// Campaigns and vouchers drop their plural on the way through; everything
/// except users is a plain dedup with no projection.
pub fn build_dimensions(data: &HashMap<&str, Frame>) -> Result<Vec<(String, Frame)>> {
    info!("transforming dimension datasets");

    let dims = vec![
        ("hotels".to_string(), require(data, "hotels")?.dedup()),
        ("rooms".to_string(), require(data, "rooms")?.dedup()),
        ("users".to_string(), build_users(data)?),
        (
            "payment_methods".to_string(),
            require(data, "payment_methods")?.dedup(),
        ),
        (
            "payment_third_parties".to_string(),
            require(data, "payment_third_parties")?.dedup(),
        ),
        ("campaign".to_string(), require(data, "campaigns")?.dedup()),
        ("voucher".to_string(), require(data, "vouchers")?.dedup()),
    ];

    info!("dimension dataset transformations complete");
    Ok(dims)
}

/// Users are enriched with the stay system's user records before
/// projection; overlapping ids merge on the reservation system's side of
/// the join.
fn build_users(data: &HashMap<&str, Frame>) -> Result<Frame> {
    let users = require(data, "users")?.dedup();
    let stay_users = require(data, "stay_users")?.dedup();

    let mut merged = users.left_join(&stay_users, "id", "id", "_stay")?.dedup();
    merged.apply("phoneNumber", format_phone_number)?;
    Ok(merged.select(&USER_COLUMNS)?)
}
