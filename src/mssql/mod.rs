// SQL Server backend
//
// - config: bb8 connection manager over a tiberius client and pool setup
// - params: binding `RowValues` onto a tiberius query
// - query: result extraction and statement execution

pub mod config;
pub mod params;
pub mod query;

pub use config::{MssqlClient, MssqlManager};
pub use params::bind_query_params;
pub use query::{execute_batch, execute_dml, execute_select};
