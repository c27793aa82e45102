//! The tabs the pipeline reads and writes, declared once.

use crate::cell::ColumnFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub format: ColumnFormat,
}

const fn col(header: &'static str, format: ColumnFormat) -> Column {
    Column { header, format }
}

/// A named tab with an ordered, typed column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl TabSchema {
    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.header)
    }

    pub fn formats(&self) -> Vec<ColumnFormat> {
        self.columns.iter().map(|c| c.format).collect()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

pub const ACCOUNT_CATEGORIZATION: TabSchema = TabSchema {
    name: "Account Categorization",
    columns: &[
        col("Title", ColumnFormat::General),
        col("Balance", ColumnFormat::Fixed2),
        col("Type", ColumnFormat::General),
    ],
};

pub const ACCOUNTS_BY_TYPE: TabSchema = TabSchema {
    name: "Accounts By Type",
    columns: &[
        col("Type", ColumnFormat::General),
        col("Balance", ColumnFormat::Fixed2),
    ],
};

pub const MANDATORY_SPENDING: TabSchema = TabSchema {
    name: "Mandatory Spending",
    columns: &[
        col("Expense Category", ColumnFormat::General),
        col("Estimated Annual Spend", ColumnFormat::Fixed2),
    ],
};

pub const RUNWAY: TabSchema = TabSchema {
    name: "Runway",
    columns: &[
        col("Metric", ColumnFormat::General),
        col("Value", ColumnFormat::General),
    ],
};

pub const RUNWAY_HISTORY: TabSchema = TabSchema {
    name: "Runway History",
    columns: &[
        col("Date", ColumnFormat::IsoDate),
        col("Runway (Days)", ColumnFormat::Integer),
        col("Last Until", ColumnFormat::IsoDate),
    ],
};

pub const ALL_TABS: [TabSchema; 5] = [
    ACCOUNT_CATEGORIZATION,
    ACCOUNTS_BY_TYPE,
    MANDATORY_SPENDING,
    RUNWAY,
    RUNWAY_HISTORY,
];
