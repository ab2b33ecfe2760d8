//! Industry tools and resources. The catalog is read-only.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use tokio_util::sync::CancellationToken;

use super::{Catalog, NoParams, fetch_page, read_page};
use crate::mcp::registry::RegistryError;
use crate::params::Arguments;
use crate::twapi::{Engine, industries};

const URI: &str = "twapi://industries";

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "industries", "Industries a company can be classified under", |engine, ct| {
        read_page(engine, ct, industries::Multiple::default(), URI)
    })?;
    catalog.tool::<NoParams>(
        "retrieve-industries",
        "List the industries a company can be classified under.",
        retrieve_industries,
    )?;
    Ok(())
}

async fn retrieve_industries(
    engine: Engine,
    _args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    fetch_page(engine, ct, industries::Multiple::default()).await
}
