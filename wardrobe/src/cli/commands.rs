// src/cli/commands.rs
use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::application::error::ApplicationError;
use crate::application::EntityStore;
use crate::cli::args::EntityAction;
use crate::cli::display::{format_entity, format_vocabulary};
use crate::cli::error::{CliError, CliResult};
use crate::domain::entity::{EntityId, EntityPatch, TaggedEntityBuilder};
use crate::domain::error::DomainError;
use crate::domain::facet::{parse_assignment, parse_facet, Facet, TagSet};
use crate::domain::query::TagFilter;
use crate::domain::tags::FacetTags;

/// Group repeated `Facet=Value` arguments by facet
pub fn parse_tag_args<F: Facet>(args: &[String]) -> CliResult<BTreeMap<F, TagSet>> {
    let mut grouped: BTreeMap<F, TagSet> = BTreeMap::new();
    for arg in args {
        let (facet, value) = parse_assignment::<F>(arg)
            .map_err(|e| CliError::InvalidInput(e.to_string()))?;
        grouped.entry(facet).or_default().insert(value);
    }
    Ok(grouped)
}

#[instrument(skip(store), level = "debug")]
pub async fn execute<T: FacetTags>(
    store: &EntityStore<T>,
    action: EntityAction,
    color: bool,
) -> CliResult<()> {
    match action {
        EntityAction::List { tags, text, json } => {
            let filter = TagFilter {
                facets: parse_tag_args(&tags)?,
                text,
            };
            let items = store.filter(&filter).await;
            debug!("{} of {} items match", items.len(), store.len().await);
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for item in &items {
                    println!("{}", format_entity(item, color));
                }
            }
            Ok(())
        }
        EntityAction::Show { id, json } => {
            let id = EntityId::new(id);
            let item = store
                .get(&id)
                .await
                .ok_or_else(|| ApplicationError::NotFound(id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&item)?);
            } else {
                println!("{}", format_entity(&item, color));
            }
            Ok(())
        }
        EntityAction::Add {
            image,
            description,
            tags,
        } => {
            let mut entity_tags = T::default();
            for (facet, values) in parse_tag_args(&tags)? {
                entity_tags.replace(facet, values)?;
            }
            let mut builder = TaggedEntityBuilder::<T>::default();
            builder.image(image).tags(entity_tags);
            if let Some(description) = description {
                builder.description(description);
            }
            let entity = builder.build().map_err(DomainError::from)?;

            let added = store.add(entity).await?;
            eprintln!("Added {} {}", T::KIND, added.id.as_ref().map_or("", EntityId::as_str));
            println!("{}", format_entity(&added, color));
            Ok(())
        }
        EntityAction::Edit {
            id,
            image,
            description,
            tags,
            clear,
        } => {
            let mut patch = EntityPatch::<T::Facet>::new();
            patch.image = image;
            patch.description = description;
            for name in &clear {
                let facet: T::Facet =
                    parse_facet(name).map_err(|e| CliError::InvalidInput(e.to_string()))?;
                patch.tags.insert(facet, TagSet::new());
            }
            patch.tags.extend(parse_tag_args(&tags)?);
            if patch.is_empty() {
                return Err(CliError::InvalidInput(
                    "nothing to change: give --image, --description, --tag or --clear".to_string(),
                ));
            }

            let edited = store.edit(&EntityId::new(id), patch).await?;
            println!("{}", format_entity(&edited, color));
            Ok(())
        }
        EntityAction::Remove { id } => {
            let id = EntityId::new(id);
            if store.remove(&id).await? {
                eprintln!("Removed {} {}", T::KIND, id);
            } else {
                eprintln!("No {} with id {}, nothing removed", T::KIND, id);
            }
            Ok(())
        }
        EntityAction::Vocab => {
            println!("{}", format_vocabulary(store.vocabulary()));
            Ok(())
        }
    }
}
