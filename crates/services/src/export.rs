use std::sync::Arc;

use loyalty_core::model::Customer;
use serde::Serialize;
use storage::repository::CustomerRepository;

use crate::Clock;
use crate::error::ExportError;

/// A rendered customer export ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerCsv {
    pub file_name: String,
    pub contents: String,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    account_number: &'a str,
    name: &'a str,
    monthly_spend: u64,
}

/// Writes `customers` as CSV with a header row, in the given order.
///
/// # Errors
///
/// Returns `csv::Error` if the writer fails.
pub fn write_customers_csv<W: std::io::Write>(
    writer: W,
    customers: &[Customer],
) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for customer in customers {
        out.serialize(CsvRow {
            account_number: customer.id().as_str(),
            name: customer.name(),
            monthly_spend: customer.monthly_spend(),
        })?;
    }
    if customers.is_empty() {
        out.write_record(["account_number", "name", "monthly_spend"])?;
    }
    out.flush()?;
    Ok(())
}

#[derive(Clone)]
pub struct CsvExport {
    clock: Clock,
    customers: Arc<dyn CustomerRepository>,
}

impl CsvExport {
    #[must_use]
    pub fn new(clock: Clock, customers: Arc<dyn CustomerRepository>) -> Self {
        Self { clock, customers }
    }

    /// Export every customer, named after today's date.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if the customers cannot be read or serialized.
    pub async fn export(&self) -> Result<CustomerCsv, ExportError> {
        let customers = self.customers.list_customers().await?;
        let mut buf = Vec::new();
        write_customers_csv(&mut buf, &customers)?;
        let contents = String::from_utf8(buf).map_err(|_| ExportError::Encoding)?;
        let file_name = format!("customers_{}.csv", self.clock.now().format("%Y-%m-%d"));
        tracing::info!(rows = customers.len(), %file_name, "customers exported");
        Ok(CustomerCsv {
            file_name,
            contents,
        })
    }
}
