//! The load pipeline.
//!
//! A [`Loader`] carries the parsing configuration and runs a request in a
//! fixed order: column filters, then the global filter, then the sort, then
//! the page window. Every path the request names is resolved before the first
//! record is read, so schema errors surface even for an empty source.

use std::borrow::Borrow;

use chrono::Duration;

use crate::clause::ParseSettings;
use crate::error::{LoadError, Result};
use crate::locale::Locale;
use crate::options::{LoadOptions, LoadResult};
use crate::ordering::OrderBy;
use crate::pager::paginate;
use crate::predicate::{column_predicate, compose, global_predicate, Predicate};
use crate::record::GridRecord;

/// Default shift, in hours, applied to date filters written in UTC.
pub const DEFAULT_UTC_ADJUSTMENT_HOURS: i64 = 3;

/// Runs load requests against in-memory record sources.
///
/// `Loader` is an immutable configuration value and can be shared freely
/// between threads.
///
/// # Example
///
/// ```
/// use aranel_grid::{
///     Field, FieldType, GridRecord, LoadOptions, Loader, Locale, MatchMode, Value,
/// };
///
/// struct City {
///     name: String,
///     population: i32,
/// }
///
/// impl GridRecord for City {
///     const RECORD_NAME: &'static str = "City";
///
///     fn field(name: &str) -> Option<Field<Self>> {
///         match name {
///             "Name" => Some(Field::value(FieldType::String, |c: &Self| {
///                 Value::String(&c.name)
///             })),
///             "Population" => Some(Field::value(FieldType::Int, |c: &Self| {
///                 Value::Int(c.population)
///             })),
///             _ => None,
///         }
///     }
/// }
///
/// let cities = vec![
///     City { name: "İzmir".into(), population: 4_479_525 },
///     City { name: "Isparta".into(), population: 445_325 },
///     City { name: "Bursa".into(), population: 3_214_571 },
/// ];
///
/// let options = LoadOptions::new()
///     .filter("Population", MatchMode::Gt, "1.000.000")
///     .sort_asc("Name");
///
/// let loader = Loader::new().locale(Locale::from_tag("tr-TR").unwrap());
/// let page = loader.load(&options, &cities).unwrap();
///
/// assert_eq!(page.total_items, 2);
/// assert_eq!(page.items[0].name, "Bursa");
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    locale: Locale,
    utc_adjustment: Duration,
}

impl Default for Loader {
    fn default() -> Self {
        Loader {
            locale: Locale::invariant(),
            utc_adjustment: Duration::hours(DEFAULT_UTC_ADJUSTMENT_HOURS),
        }
    }
}

impl Loader {
    /// Creates a loader with the invariant locale and the default UTC shift.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the locale used to parse filter values and to fold case when
    /// filtering and sorting text.
    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Sets the shift applied to date filters written in UTC.
    ///
    /// The default of three hours is a fixed timezone assumption carried over
    /// from the grids this engine serves. Use `Duration::zero()` to compare UTC
    /// input as written.
    pub fn utc_adjustment(mut self, adjustment: Duration) -> Self {
        self.utc_adjustment = adjustment;
        self
    }

    fn settings(&self) -> ParseSettings<'_> {
        ParseSettings {
            locale: &self.locale,
            utc_adjustment: self.utc_adjustment,
        }
    }

    /// Resolves and builds everything the request needs, reading no records.
    fn plan<T: GridRecord>(&self, options: &LoadOptions) -> Result<Plan<T>> {
        let settings = self.settings();
        let column = column_predicate::<T>(&options.column_filters, settings)?;
        let global = global_predicate::<T>(
            Some(options.global_filter.as_str()),
            &options.global_filter_columns,
            settings,
        )?;
        let order = OrderBy::from_request(
            options.sort_column.as_deref(),
            options.sort_direction.as_deref(),
        )?
        .map(|order| order.casing(self.locale.casing_rules()));

        let predicate = compose(column, global);
        tracing::debug!(
            clauses = predicate.clause_count(),
            sort = ?order,
            "load planned"
        );

        Ok(Plan {
            predicate,
            order,
            page_number: options.page_number,
            page_size: options.page_size,
        })
    }

    /// Loads one page of borrowed records.
    pub fn load<'a, T: GridRecord>(
        &self,
        options: &LoadOptions,
        records: &'a [T],
    ) -> Result<LoadResult<&'a T>> {
        let span = tracing::debug_span!("grid_load", record = T::RECORD_NAME);
        let _enter = span.enter();

        let plan = self.plan::<T>(options)?;
        let matched: Vec<&T> = records.iter().filter(|r| plan.predicate.matches(r)).collect();
        Ok(plan.finish(matched))
    }

    /// Loads one page of cloned records.
    pub fn load_cloned<T: GridRecord + Clone>(
        &self,
        options: &LoadOptions,
        records: &[T],
    ) -> Result<LoadResult<T>> {
        self.load(options, records).map(LoadResult::cloned)
    }

    /// Loads one page from a fallible record source.
    ///
    /// The source is not touched if the request does not resolve. The first
    /// source error stops the load and is returned unchanged.
    pub fn try_load<T, E, I>(
        &self,
        options: &LoadOptions,
        source: I,
    ) -> std::result::Result<LoadResult<T>, LoadError<E>>
    where
        T: GridRecord,
        I: IntoIterator<Item = std::result::Result<T, E>>,
    {
        let span = tracing::debug_span!("grid_load", record = T::RECORD_NAME);
        let _enter = span.enter();

        let plan = self.plan::<T>(options)?;
        let mut matched = Vec::new();
        for record in source {
            let record = record.map_err(LoadError::Source)?;
            if plan.predicate.matches(&record) {
                matched.push(record);
            }
        }
        Ok(plan.finish(matched))
    }
}

struct Plan<T> {
    predicate: Predicate<T>,
    order: Option<OrderBy<T>>,
    page_number: i32,
    page_size: i32,
}

impl<T: GridRecord> Plan<T> {
    fn finish<R: Borrow<T>>(&self, mut matched: Vec<R>) -> LoadResult<R> {
        if let Some(order) = &self.order {
            order.apply(&mut matched);
        }
        let page = paginate(matched, self.page_number, self.page_size);
        tracing::debug!(
            total_items = page.total_items,
            total_pages = page.total_pages,
            returned = page.items.len(),
            "load complete"
        );
        page
    }
}

/// Loads one page of `records` with the default UTC shift.
///
/// `locale` defaults to the invariant locale.
pub fn load<'a, T: GridRecord>(
    options: &LoadOptions,
    records: &'a [T],
    locale: Option<&Locale>,
) -> Result<LoadResult<&'a T>> {
    let loader = match locale {
        Some(locale) => Loader::new().locale(locale.clone()),
        None => Loader::new(),
    };
    loader.load(options, records)
}
