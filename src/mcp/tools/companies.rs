//! Company tools and resources.

use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use rmcp::{schemars, schemars::JsonSchema};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{
    Catalog, SearchParams, bind, confirm, create, fetch_one, fetch_page, read_one, read_page,
    required_id, search_binders,
};
use crate::mcp::registry::RegistryError;
use crate::params::{
    Arguments, Binder, optional_numeric_list_pointer_param, optional_numeric_pointer_param,
    optional_pointer_param, required_numeric_param, required_param,
};
use crate::twapi::{Engine, companies};

const URI: &str = "twapi://companies";
const TEMPLATE: &str = "twapi://companies/{id}";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListCompaniesParams {
    #[serde(flatten)]
    pub search: SearchParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct GetCompanyParams {
    #[schemars(description = "Company ID")]
    pub company_id: i64,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct CompanyFieldParams {
    #[schemars(description = "First address line")]
    pub address_one: Option<String>,
    #[schemars(description = "Second address line")]
    pub address_two: Option<String>,
    #[schemars(description = "City")]
    pub city: Option<String>,
    #[schemars(description = "State or region")]
    pub state: Option<String>,
    #[schemars(description = "Postal code")]
    pub zip: Option<String>,
    #[schemars(description = "Two-letter ISO country code", length(max = 2))]
    pub country_code: Option<String>,
    #[schemars(description = "Phone number")]
    pub phone: Option<String>,
    #[schemars(description = "Fax number")]
    pub fax: Option<String>,
    #[schemars(description = "Primary email address")]
    pub email_one: Option<String>,
    #[schemars(description = "Secondary email address")]
    pub email_two: Option<String>,
    #[schemars(description = "Tertiary email address")]
    pub email_three: Option<String>,
    #[schemars(description = "Website URL")]
    pub website: Option<String>,
    #[schemars(description = "Free-form profile")]
    pub profile_text: Option<String>,
    #[schemars(description = "User who manages the company")]
    pub manager_id: Option<i64>,
    #[schemars(description = "Industry, see retrieve-industries")]
    pub industry_id: Option<i64>,
    #[schemars(description = "Tags applied to the company. An empty list removes every tag.")]
    pub tag_ids: Option<Vec<i64>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateCompanyParams {
    #[schemars(description = "Company name")]
    pub name: String,
    #[serde(flatten)]
    pub fields: CompanyFieldParams,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateCompanyParams {
    #[schemars(description = "Company ID to update")]
    pub company_id: i64,
    #[schemars(description = "Company name")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: CompanyFieldParams,
}

pub(super) fn register(catalog: &mut Catalog) -> Result<(), RegistryError> {
    catalog.resource(URI, "companies", "First page of companies", |engine, ct| {
        read_page(engine, ct, companies::Multiple::default(), URI)
    })?;
    catalog.template(TEMPLATE, "company", "A single company by id", |engine, id, ct| {
        let single = companies::Single {
            id,
            ..Default::default()
        };
        read_one(engine, ct, single, format!("{URI}/{id}"))
    })?;

    catalog.tool::<ListCompaniesParams>(
        "retrieve-companies",
        "List client companies. Filter by search term or tags; results are paginated.",
        retrieve_companies,
    )?;
    catalog.tool::<GetCompanyParams>(
        "retrieve-company",
        "Get a company by id.",
        retrieve_company,
    )?;
    catalog.tool::<CreateCompanyParams>("create-company", "Create a company.", create_company)?;
    catalog.tool::<UpdateCompanyParams>(
        "update-company",
        "Update a company. Only the given fields change.",
        update_company,
    )?;
    catalog.tool::<GetCompanyParams>("delete-company", "Delete a company.", delete_company)?;
    Ok(())
}

fn field_binders(fields: &mut companies::Fields) -> Vec<Binder<'_>> {
    let companies::Fields {
        address_one,
        address_two,
        city,
        state,
        zip,
        country_code,
        phone,
        fax,
        email_one,
        email_two,
        email_three,
        website,
        profile_text,
        manager_id,
        industry_id,
        tag_ids,
    } = fields;
    vec![
        optional_pointer_param(address_one, "address-one"),
        optional_pointer_param(address_two, "address-two"),
        optional_pointer_param(city, "city"),
        optional_pointer_param(state, "state"),
        optional_pointer_param(zip, "zip"),
        optional_pointer_param(country_code, "country-code"),
        optional_pointer_param(phone, "phone"),
        optional_pointer_param(fax, "fax"),
        optional_pointer_param(email_one, "email-one"),
        optional_pointer_param(email_two, "email-two"),
        optional_pointer_param(email_three, "email-three"),
        optional_pointer_param(website, "website"),
        optional_pointer_param(profile_text, "profile-text"),
        optional_numeric_pointer_param(manager_id, "manager-id"),
        optional_numeric_pointer_param(industry_id, "industry-id"),
        optional_numeric_list_pointer_param(tag_ids, "tag-ids"),
    ]
}

pub(super) fn bind_create(args: &Arguments) -> Result<companies::Create, McpError> {
    let mut create = companies::Create::default();
    let companies::Create { name, fields } = &mut create;
    let mut binders = vec![required_param(name, "name")];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    Ok(create)
}

pub(super) fn bind_update(args: &Arguments) -> Result<companies::Update, McpError> {
    let mut update = companies::Update::default();
    let companies::Update { id, name, fields } = &mut update;
    let mut binders = vec![
        required_numeric_param(id, "company-id"),
        optional_pointer_param(name, "name"),
    ];
    binders.extend(field_binders(fields));
    bind(args, binders)?;
    Ok(update)
}

async fn retrieve_companies(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let mut multiple = companies::Multiple::default();
    bind(&args, search_binders(&mut multiple.filters))?;
    fetch_page(engine, ct, multiple).await
}

async fn retrieve_company(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let single = companies::Single {
        id: required_id(&args, "company-id")?,
        ..Default::default()
    };
    fetch_one(engine, ct, single).await
}

async fn create_company(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    create(engine, ct, bind_create(&args)?, "Company").await
}

async fn update_company(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let update = bind_update(&args)?;
    confirm(engine, ct, update, "Company updated successfully".to_string()).await
}

async fn delete_company(
    engine: Engine,
    args: Arguments,
    ct: CancellationToken,
) -> Result<CallToolResult, McpError> {
    let delete = companies::Delete {
        id: required_id(&args, "company-id")?,
    };
    confirm(engine, ct, delete, "Company deleted successfully".to_string()).await
}
