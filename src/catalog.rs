//! Fixed extraction catalog for the four operational databases.

/// One full-table query and the staged dataset name its result lands under.
#[derive(Debug, Clone, Copy)]
pub struct TableQuery {
    pub dataset: &'static str,
    pub query: &'static str,
}

/// One logical source database and its fixed table queries.
#[derive(Debug, Clone, Copy)]
pub struct SourceDatabase {
    pub name: &'static str,
    pub tables: &'static [TableQuery],
}

/// Every dataset the extractor stages, in extraction order.
///
/// The stay system keeps its own copies of `Users` and `Hotels`; those are
/// staged under `stay_`-prefixed names to keep them apart from the
/// reservation system's tables.
pub const SOURCE_DATABASES: &[SourceDatabase] = &[
    SourceDatabase {
        name: "promotion_db",
        tables: &[
            TableQuery {
                dataset: "campaigns",
                query: "SELECT * FROM Campaign",
            },
            TableQuery {
                dataset: "vouchers",
                query: "SELECT * FROM Voucher",
            },
        ],
    },
    SourceDatabase {
        name: "payment_db",
        tables: &[
            TableQuery {
                dataset: "payment_third_parties",
                query: "SELECT * FROM PaymentThirdParties",
            },
            TableQuery {
                dataset: "payment_methods",
                query: "SELECT * FROM PaymentMethods",
            },
            TableQuery {
                dataset: "payments",
                query: "SELECT * FROM Payments",
            },
        ],
    },
    SourceDatabase {
        name: "reservation_db",
        tables: &[
            TableQuery {
                dataset: "users",
                query: "SELECT * FROM Users",
            },
            TableQuery {
                dataset: "hotels",
                query: "SELECT * FROM Hotels",
            },
            TableQuery {
                dataset: "reservations",
                query: "SELECT * FROM Reservations",
            },
            TableQuery {
                dataset: "reservation_items",
                query: "SELECT * FROM ReservationItems",
            },
        ],
    },
    SourceDatabase {
        name: "stay_db",
        tables: &[
            TableQuery {
                dataset: "stay_users",
                query: "SELECT * FROM Users",
            },
            TableQuery {
                dataset: "stay_hotels",
                query: "SELECT * FROM Hotels",
            },
            TableQuery {
                dataset: "rooms",
                query: "SELECT * FROM Rooms",
            },
            TableQuery {
                dataset: "stays",
                query: "SELECT * FROM Stays",
            },
        ],
    },
];
