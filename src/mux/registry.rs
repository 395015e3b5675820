//! Fixed category to endpoint mapping.
//!
//! Built once before the router starts and never mutated afterwards, so it is
//! shared by `Arc` without a lock.

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::error::ConfigError;
use crate::event::Category;

use super::endpoint::Record;

/// Both ends of one category's rendezvous channel.
#[derive(Debug)]
pub(crate) struct Route {
    pub tx: Sender<Record>,
    pub rx: Receiver<Record>,
}

impl Route {
    fn new() -> Self {
        // Zero capacity: a send completes only when a reader takes the record.
        let (tx, rx) = bounded::<Record>(0);
        Self { tx, rx }
    }
}

#[derive(Debug)]
pub(crate) struct Registry {
    routes: [Option<Route>; Category::COUNT],
}

impl Registry {
    /// Allocates one route per requested category. Duplicates collapse.
    pub(crate) fn new(categories: impl IntoIterator<Item = Category>) -> Result<Self, ConfigError> {
        let mut routes: [Option<Route>; Category::COUNT] = std::array::from_fn(|_| None);
        for category in categories {
            let slot = &mut routes[category.index()];
            if slot.is_none() {
                *slot = Some(Route::new());
            }
        }

        if routes.iter().all(Option::is_none) {
            return Err(ConfigError::NoCategories);
        }

        Ok(Self { routes })
    }

    pub(crate) fn route(&self, category: Category) -> Option<&Route> {
        self.routes[category.index()].as_ref()
    }

    /// Registered categories in `Category::ALL` order.
    pub(crate) fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.routes[c.index()].is_some())
            .collect()
    }
}
