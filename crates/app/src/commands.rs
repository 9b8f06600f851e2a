//! Subcommands and how they map onto the records API.
//!
//! Writes go through [`ResourceForm`], so a command line create/update gets
//! the same validation and single-submission handling as any other form.

use api_types::{Category, EntryKind, Resource, ResourceId};
use clap::{Args, Subcommand};
use client::{
    EntryService, ResourceClient, ResourceStore, Transport,
    form::{FormMode, ResourceForm, Validate},
};
use serde_json::{Map, Value};

use crate::error::Result;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage entries.
    Entries {
        #[command(subcommand)]
        action: EntryAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    List,
    Get {
        id: ResourceId,
    },
    Create(CategoryFields),
    /// Loads the category, applies the given fields and saves it.
    Update {
        id: ResourceId,
        #[command(flatten)]
        fields: CategoryFields,
    },
    Delete {
        id: ResourceId,
    },
}

#[derive(Debug, Subcommand)]
pub enum EntryAction {
    List,
    Get {
        id: ResourceId,
    },
    Create(EntryFields),
    /// Loads the entry, applies the given fields and saves it.
    Update {
        id: ResourceId,
        #[command(flatten)]
        fields: EntryFields,
    },
    Delete {
        id: ResourceId,
    },
    /// Entries dated within a calendar month.
    Month {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        #[arg(long)]
        year: i32,
    },
}

#[derive(Debug, Default, Args)]
pub struct CategoryFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct EntryFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// income or expense.
    #[arg(long = "type")]
    kind: Option<EntryKind>,
    /// Decimal amount, `.` or `,` as separator.
    #[arg(long)]
    amount: Option<String>,
    /// DD/MM/YYYY.
    #[arg(long)]
    date: Option<String>,
    #[arg(long, action = clap::ArgAction::Set)]
    paid: Option<bool>,
    #[arg(long)]
    category_id: Option<ResourceId>,
}

fn set(bag: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        bag.insert(key.to_string(), value);
    }
}

impl CategoryFields {
    fn apply(&self, bag: &mut Map<String, Value>) {
        set(bag, "name", self.name.as_deref().map(Value::from));
        set(bag, "description", self.description.as_deref().map(Value::from));
    }
}

impl EntryFields {
    fn apply(&self, bag: &mut Map<String, Value>) {
        set(bag, "name", self.name.as_deref().map(Value::from));
        set(bag, "description", self.description.as_deref().map(Value::from));
        set(bag, "type", self.kind.map(|kind| Value::from(kind.as_str())));
        set(bag, "amount", self.amount.as_deref().map(Value::from));
        set(bag, "date", self.date.as_deref().map(Value::from));
        set(bag, "paid", self.paid.map(Value::from));
        set(bag, "categoryId", self.category_id.map(Value::from));
    }
}

pub async fn run<A: Transport>(command: Command, transport: A) -> Result<()> {
    match command {
        Command::Categories { action } => {
            categories(action, ResourceClient::for_resource(transport)).await
        }
        Command::Entries { action } => entries(action, EntryService::new(transport)).await,
    }
}

async fn categories<A: Transport>(
    action: CategoryAction,
    client: ResourceClient<Category, A>,
) -> Result<()> {
    match action {
        CategoryAction::List => print_all(&client.list().await?),
        CategoryAction::Get { id } => print(&client.get_by_id(id).await?),
        CategoryAction::Create(fields) => {
            let saved = save(client, FormMode::New, |bag| fields.apply(bag)).await?;
            print(&saved)
        }
        CategoryAction::Update { id, fields } => {
            let saved = save(client, FormMode::Edit(id), |bag| fields.apply(bag)).await?;
            print(&saved)
        }
        CategoryAction::Delete { id } => {
            client.delete(id).await?;
            tracing::info!("category {id} deleted");
            Ok(())
        }
    }
}

async fn entries<A: Transport>(action: EntryAction, service: EntryService<A>) -> Result<()> {
    match action {
        EntryAction::List => print_all(&service.list().await?),
        EntryAction::Get { id } => print(&service.get_by_id(id).await?),
        EntryAction::Create(fields) => {
            let saved = save(service, FormMode::New, |bag| fields.apply(bag)).await?;
            print(&saved)
        }
        EntryAction::Update { id, fields } => {
            let saved = save(service, FormMode::Edit(id), |bag| fields.apply(bag)).await?;
            print(&saved)
        }
        EntryAction::Delete { id } => {
            service.delete(id).await?;
            tracing::info!("entry {id} deleted");
            Ok(())
        }
        EntryAction::Month { month, year } => {
            print_all(&service.get_by_month_and_year(month, year).await?)
        }
    }
}

/// Opens a form, pre-populates it (edit mode), patches the field bag and
/// submits it once.
async fn save<T, S>(store: S, mode: FormMode, patch: impl FnOnce(&mut Map<String, Value>)) -> Result<T>
where
    T: Resource + Validate,
    S: ResourceStore<T>,
{
    let mut form = ResourceForm::new(store, mode);
    let mut bag = form.load().await?.to_json();
    if let Some(map) = bag.as_object_mut() {
        patch(map);
    }

    tracing::debug!("{}", form.page_title());
    let saved = form.submit(&bag).await?;
    Ok(saved.clone())
}

fn print<T: Resource>(resource: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&resource.to_json())?);
    Ok(())
}

fn print_all<T: Resource>(resources: &[T]) -> Result<()> {
    let list = Value::Array(resources.iter().map(Resource::to_json).collect());
    println!("{}", serde_json::to_string_pretty(&list)?);
    Ok(())
}
