//! Expandable token map tree
//!
//! Layers and categories sit behind `Arc`. An edit rebuilds only the path from
//! the root to the touched node; every other branch is shared with the
//! previous board.

use super::{aggregate, format};
use crate::models::{ProviderDistribution, TokenMapCategory, TokenMapData, TokenMapLayer, UseCase};
use std::sync::Arc;

/// Category with its expand flag
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub expanded: bool,
    pub use_cases: Vec<UseCase>,
}

impl Category {
    pub fn total_tokens(&self) -> u64 {
        aggregate::category_total(self)
    }

    fn toggled(&self) -> Self {
        Self {
            expanded: !self.expanded,
            ..self.clone()
        }
    }
}

/// Layer with its expand flag
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub name_en: String,
    pub icon: String,
    pub color: String,
    pub expanded: bool,
    pub categories: Vec<Arc<Category>>,
}

impl Layer {
    pub fn use_cases(&self) -> impl Iterator<Item = &UseCase> {
        self.categories.iter().flat_map(|c| c.use_cases.iter())
    }

    pub fn total_tokens(&self) -> u64 {
        aggregate::layer_total(self)
    }

    pub fn category(&self, category_id: &str) -> Option<&Arc<Category>> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    fn toggled(&self) -> Self {
        Self {
            expanded: !self.expanded,
            ..self.clone()
        }
    }
}

/// View-state of the token map page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    layers: Vec<Arc<Layer>>,
}

impl Board {
    pub fn new(layers: Vec<Arc<Layer>>) -> Self {
        Self { layers }
    }

    /// Build the view-state for a freshly loaded map. The first layer and
    /// its first category start expanded; everything else is collapsed.
    pub fn from_token_map(data: &TokenMapData) -> Self {
        let layers = data
            .layers
            .iter()
            .enumerate()
            .map(|(li, layer)| {
                let categories = layer
                    .categories
                    .iter()
                    .enumerate()
                    .map(|(ci, category)| {
                        Arc::new(Category {
                            id: category.id.clone(),
                            name: category.name.clone(),
                            expanded: li == 0 && ci == 0,
                            use_cases: category.use_cases.clone(),
                        })
                    })
                    .collect();

                Arc::new(Layer {
                    id: layer.id.clone(),
                    name: layer.name.clone(),
                    name_en: layer.name_en.clone(),
                    icon: layer.icon.clone(),
                    color: layer.color.clone(),
                    expanded: li == 0,
                    categories,
                })
            })
            .collect();

        Self { layers }
    }

    /// Strip the expand flags, giving back the service shape
    pub fn to_layers(&self) -> Vec<TokenMapLayer> {
        self.layers
            .iter()
            .map(|layer| TokenMapLayer {
                id: layer.id.clone(),
                name: layer.name.clone(),
                name_en: layer.name_en.clone(),
                icon: layer.icon.clone(),
                color: layer.color.clone(),
                categories: layer
                    .categories
                    .iter()
                    .map(|c| TokenMapCategory {
                        id: c.id.clone(),
                        name: c.name.clone(),
                        use_cases: c.use_cases.clone(),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn layers(&self) -> &[Arc<Layer>] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// True when both boards hold the very same layer nodes
    pub fn ptr_eq(&self, other: &Board) -> bool {
        self.layers.len() == other.layers.len()
            && self
                .layers
                .iter()
                .zip(&other.layers)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }

    pub fn layer(&self, layer_id: &str) -> Option<&Arc<Layer>> {
        self.layers.iter().find(|l| l.id == layer_id)
    }

    pub fn use_cases(&self) -> impl Iterator<Item = &UseCase> {
        self.layers.iter().flat_map(|l| l.use_cases())
    }

    pub fn find_use_case(&self, layer_id: &str, use_case_id: &str) -> Option<&UseCase> {
        self.layer(layer_id)?
            .use_cases()
            .find(|uc| uc.id == use_case_id)
    }

    pub fn total_tokens(&self) -> u64 {
        aggregate::board_total(self)
    }

    pub fn provider_distribution(&self) -> Vec<ProviderDistribution> {
        aggregate::provider_distribution(self.use_cases())
    }

    /// Flip the expand flag of one layer
    pub fn toggle_layer(&self, layer_id: &str) -> Board {
        self.map_layers(layer_id, |layer| Some(layer.toggled()))
    }

    /// Flip the expand flag of one category within a layer
    pub fn toggle_category(&self, layer_id: &str, category_id: &str) -> Board {
        self.map_layers(layer_id, |layer| {
            layer
                .category(category_id)
                .is_some()
                .then(|| Layer {
                    categories: map_matching(&layer.categories, |c| c.id == category_id, Category::toggled),
                    ..layer.clone()
                })
        })
    }

    /// Apply free-text input such as `2.5m` to an editable use case.
    ///
    /// Input that does not parse leaves the board untouched.
    pub fn update_use_case_tokens(&self, layer_id: &str, use_case_id: &str, input: &str) -> Board {
        match format::parse_token_input(input) {
            Some(tokens) => self.set_use_case_tokens(layer_id, use_case_id, tokens),
            None => {
                tracing::debug!(layer_id, use_case_id, input, "Ignoring non-numeric token input");
                self.clone()
            }
        }
    }

    /// Overwrite the token count of one editable use case. Unknown or
    /// read-only use cases leave the board untouched.
    pub fn set_use_case_tokens(&self, layer_id: &str, use_case_id: &str, tokens: u64) -> Board {
        let is_target = |uc: &UseCase| uc.id == use_case_id && uc.editable;

        self.map_layers(layer_id, |layer| {
            let touches = layer.use_cases().any(|uc| is_target(uc) && uc.tokens != tokens);
            touches.then(|| Layer {
                categories: map_matching(
                    &layer.categories,
                    |c| c.use_cases.iter().any(is_target),
                    |c| Category {
                        use_cases: c
                            .use_cases
                            .iter()
                            .map(|uc| {
                                if is_target(uc) {
                                    UseCase { tokens, ..uc.clone() }
                                } else {
                                    uc.clone()
                                }
                            })
                            .collect(),
                        ..c.clone()
                    },
                ),
                ..layer.clone()
            })
        })
    }

    /// Rebuild the matching layers with `f`; `None` from `f` keeps the layer
    /// as is. Returns a board sharing every layer that was not rebuilt.
    fn map_layers<F>(&self, layer_id: &str, f: F) -> Board
    where
        F: Fn(&Layer) -> Option<Layer>,
    {
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                if layer.id == layer_id {
                    if let Some(next) = f(layer.as_ref()) {
                        return Arc::new(next);
                    }
                }
                Arc::clone(layer)
            })
            .collect();

        Board { layers }
    }
}

fn map_matching<T, P, F>(items: &[Arc<T>], matches: P, f: F) -> Vec<Arc<T>>
where
    P: Fn(&T) -> bool,
    F: Fn(&T) -> T,
{
    items
        .iter()
        .map(|item| {
            if matches(item.as_ref()) {
                Arc::new(f(item.as_ref()))
            } else {
                Arc::clone(item)
            }
        })
        .collect()
}
