use crate::query::filter::Filter;
use crate::query::sort::SortSpec;

/// Typed find query handed to the store: filter plus result shaping.
/// Projection is applied by the caller; the store only sees what affects
/// which documents come back and in what order.
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    filter: Filter,
    sort: Option<SortSpec>,
    skip: usize,
    limit: Option<usize>,
}

impl FindQuery {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            sort: None,
            skip: 0,
            limit: None,
        }
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
