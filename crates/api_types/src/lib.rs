pub mod export {
    use serde::Deserialize;

    /// Query string accepted by every `/export/*` endpoint.
    ///
    /// Both values are kept as raw strings: the server validates them and the
    /// expenses/other filenames embed them as sent, minus surrounding
    /// whitespace.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExportQuery {
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    /// Kind of CSV export.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum ExportKind {
        Transactions,
        Expenses,
        Other,
    }

    impl ExportKind {
        /// Prefix used in the attachment filename.
        pub fn file_prefix(self) -> &'static str {
            match self {
                Self::Transactions => "transactions",
                Self::Expenses => "expenses",
                Self::Other => "other",
            }
        }

        /// Client facing message returned when the export fails.
        pub fn failure_message(self) -> &'static str {
            match self {
                Self::Transactions => "Failed to export transactions",
                Self::Expenses => "Failed to export expenses",
                Self::Other => "Failed to export other entries",
            }
        }
    }
}

pub mod error {
    use serde::Serialize;

    /// JSON body of every non-2xx response: `{"error": "..."}`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize)]
    pub struct ErrorBody {
        pub error: String,
    }

    impl ErrorBody {
        pub fn new(error: impl Into<String>) -> Self {
            Self {
                error: error.into(),
            }
        }
    }
}
