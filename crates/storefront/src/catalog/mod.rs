//! Catalog listing: query normalization and result shaping.
//!
//! Client-supplied listing parameters arrive as loosely-typed query strings
//! and leave this module as a fully-defaulted [`ListingSpec`] - no partial
//! or undefined values ever reach the database layer. The SQL plan built
//! from a spec lives in [`crate::db::products`]; the client-facing response
//! shapes live in [`shape`].

pub mod shape;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use shape::{ListedImage, ListedProduct, ListedSeller, ListingResponse};

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Upper bound on the page size; larger requests are clamped, not rejected.
pub const MAX_PAGE_SIZE: u32 = 48;

/// Inventory at or below this count (and above zero) is low stock.
pub const LOW_STOCK_MAX: i32 = 5;

/// Minimum seller rating for the top-rated tier (verified sellers only).
pub const TOP_RATED_MIN_RATING: f64 = 4.5;

/// Errors produced while normalizing listing parameters.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("page must be at least 1")]
    InvalidPage,
    #[error("limit must be at least 1")]
    InvalidLimit,
    #[error("price range is invalid: min must be >= 0 and <= max")]
    InvalidPriceRange,
    #[error("minimum rating must be between 0 and 5")]
    InvalidRating,
    #[error("unknown availability facet: {0}")]
    UnknownAvailability(String),
    #[error("unknown seller facet: {0}")]
    UnknownSellerTier(String),
    #[error("unknown sort key: {0}")]
    UnknownSort(String),
}

/// Raw listing query parameters, as deserialized from the URL.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Free-text search term.
    pub q: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<f64>,
    /// Comma-separated availability facets.
    pub availability: Option<String>,
    /// Comma-separated seller-quality facets.
    pub seller: Option<String>,
    pub sort: Option<String>,
}

/// Computed availability facet of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityFacet {
    InStock,
    LowStock,
    OutOfStock,
}

impl AvailabilityFacet {
    /// Facet value as stored-procedure-free SQL literal text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::LowStock => "low_stock",
            Self::OutOfStock => "out_of_stock",
        }
    }

    /// Compute the facet for an inventory count. Mirrors the SQL CASE
    /// expression used for facet filtering; keep the two in sync.
    #[must_use]
    pub const fn for_inventory(count: i32) -> Self {
        if count <= 0 {
            Self::OutOfStock
        } else if count <= LOW_STOCK_MAX {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

impl std::str::FromStr for AvailabilityFacet {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_stock" => Ok(Self::InStock),
            "low_stock" => Ok(Self::LowStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            other => Err(ListingError::UnknownAvailability(other.to_string())),
        }
    }
}

/// Computed seller-quality facet of a product's seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SellerTier {
    TopRated,
    Verified,
    Standard,
}

impl SellerTier {
    /// Facet value as SQL literal text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopRated => "top_rated",
            Self::Verified => "verified",
            Self::Standard => "standard",
        }
    }

    /// Compute the tier for a seller. Mirrors the SQL CASE expression used
    /// for facet filtering; keep the two in sync.
    #[must_use]
    pub fn for_seller(verified: bool, rating: Option<f64>) -> Self {
        if verified && rating.unwrap_or(0.0) >= TOP_RATED_MIN_RATING {
            Self::TopRated
        } else if verified {
            Self::Verified
        } else {
            Self::Standard
        }
    }
}

impl std::str::FromStr for SellerTier {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_rated" => Ok(Self::TopRated),
            "verified" => Ok(Self::Verified),
            "standard" => Ok(Self::Standard),
            other => Err(ListingError::UnknownSellerTier(other.to_string())),
        }
    }
}

/// Listing sort key. Every key has a deterministic tiebreak so pagination
/// is stable across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first by creation time (default).
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    /// Most ordered first, by order-item count.
    BestSelling,
}

impl std::str::FromStr for SortKey {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "best_selling" => Ok(Self::BestSelling),
            other => Err(ListingError::UnknownSort(other.to_string())),
        }
    }
}

/// Normalized, fully-defaulted listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSpec {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<f64>,
    /// Empty set means no availability filtering.
    pub availability: Vec<AvailabilityFacet>,
    /// Empty set means no seller-tier filtering.
    pub seller_tiers: Vec<SellerTier>,
    pub sort: SortKey,
}

impl Default for ListingSpec {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            category: None,
            min_price: None,
            max_price: None,
            min_rating: None,
            availability: Vec::new(),
            seller_tiers: Vec::new(),
            sort: SortKey::default(),
        }
    }
}

impl ListingSpec {
    /// Normalize raw query parameters into a fully-resolved spec.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError`] for out-of-range pages/limits, inverted or
    /// negative price ranges, ratings outside 0-5, and unknown facet or
    /// sort tokens. Oversized limits are clamped rather than rejected.
    pub fn from_params(params: ListingParams) -> Result<Self, ListingError> {
        let page = params.page.unwrap_or(1);
        if page < 1 {
            return Err(ListingError::InvalidPage);
        }

        let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if limit < 1 {
            return Err(ListingError::InvalidLimit);
        }
        let limit = limit.min(MAX_PAGE_SIZE);

        if let Some(min) = params.min_price
            && min < Decimal::ZERO
        {
            return Err(ListingError::InvalidPriceRange);
        }
        if let Some(max) = params.max_price
            && max < Decimal::ZERO
        {
            return Err(ListingError::InvalidPriceRange);
        }
        if let (Some(min), Some(max)) = (params.min_price, params.max_price)
            && min > max
        {
            return Err(ListingError::InvalidPriceRange);
        }

        if let Some(rating) = params.min_rating
            && !(0.0..=5.0).contains(&rating)
        {
            return Err(ListingError::InvalidRating);
        }

        let availability = parse_facet_list(params.availability.as_deref())?;
        let seller_tiers = parse_facet_list(params.seller.as_deref())?;

        let sort = match params.sort.as_deref() {
            None | Some("") => SortKey::default(),
            Some(s) => s.parse()?,
        };

        // Blank search/category collapse to no filter
        let search = params.q.filter(|s| !s.trim().is_empty());
        let category = params.category.filter(|s| !s.trim().is_empty());

        Ok(Self {
            page,
            limit,
            search,
            category,
            min_price: params.min_price,
            max_price: params.max_price,
            min_rating: params.min_rating,
            availability,
            seller_tiers,
            sort,
        })
    }

    /// Rows to skip for the requested page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

/// Parse a comma-separated facet list, deduplicating while preserving order.
fn parse_facet_list<T>(raw: Option<&str>) -> Result<Vec<T>, ListingError>
where
    T: std::str::FromStr<Err = ListingError> + PartialEq,
{
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut facets = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let facet = token.parse::<T>()?;
        if !facets.contains(&facet) {
            facets.push(facet);
        }
    }
    Ok(facets)
}

/// Pagination metadata computed from the full (unpaginated) result count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl Pagination {
    /// Compute pagination for a page/limit pair and a total row count.
    ///
    /// `pages` is exact: `ceil(total / limit)`, with zero totals yielding
    /// zero pages.
    #[must_use]
    pub const fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            (total.div_ceil(limit as u64)) as u32
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }

    /// Pagination for a degraded (store failure) listing response.
    #[must_use]
    pub const fn empty(page: u32, limit: u32) -> Self {
        Self::new(page, limit, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let spec = ListingSpec::from_params(ListingParams::default()).expect("valid");
        assert_eq!(spec, ListingSpec::default());
        assert_eq!(spec.page, 1);
        assert_eq!(spec.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(spec.sort, SortKey::Newest);
        assert!(spec.availability.is_empty());
    }

    #[test]
    fn test_page_zero_rejected() {
        let params = ListingParams {
            page: Some(0),
            ..ListingParams::default()
        };
        assert!(matches!(
            ListingSpec::from_params(params),
            Err(ListingError::InvalidPage)
        ));
    }

    #[test]
    fn test_limit_zero_rejected_and_oversize_clamped() {
        let params = ListingParams {
            limit: Some(0),
            ..ListingParams::default()
        };
        assert!(matches!(
            ListingSpec::from_params(params),
            Err(ListingError::InvalidLimit)
        ));

        let params = ListingParams {
            limit: Some(500),
            ..ListingParams::default()
        };
        let spec = ListingSpec::from_params(params).expect("valid");
        assert_eq!(spec.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let params = ListingParams {
            min_price: Some(Decimal::new(5000, 2)),
            max_price: Some(Decimal::new(1000, 2)),
            ..ListingParams::default()
        };
        assert!(matches!(
            ListingSpec::from_params(params),
            Err(ListingError::InvalidPriceRange)
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let params = ListingParams {
            min_price: Some(Decimal::new(-100, 2)),
            ..ListingParams::default()
        };
        assert!(matches!(
            ListingSpec::from_params(params),
            Err(ListingError::InvalidPriceRange)
        ));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        for rating in [-0.1, 5.1] {
            let params = ListingParams {
                min_rating: Some(rating),
                ..ListingParams::default()
            };
            assert!(matches!(
                ListingSpec::from_params(params),
                Err(ListingError::InvalidRating)
            ));
        }
    }

    #[test]
    fn test_facet_lists_parsed_and_deduplicated() {
        let params = ListingParams {
            availability: Some("in_stock, low_stock,in_stock".to_string()),
            seller: Some("top_rated".to_string()),
            ..ListingParams::default()
        };
        let spec = ListingSpec::from_params(params).expect("valid");
        assert_eq!(
            spec.availability,
            vec![AvailabilityFacet::InStock, AvailabilityFacet::LowStock]
        );
        assert_eq!(spec.seller_tiers, vec![SellerTier::TopRated]);
    }

    #[test]
    fn test_unknown_facet_rejected() {
        let params = ListingParams {
            availability: Some("backordered".to_string()),
            ..ListingParams::default()
        };
        assert!(matches!(
            ListingSpec::from_params(params),
            Err(ListingError::UnknownAvailability(_))
        ));
    }

    #[test]
    fn test_unknown_sort_rejected() {
        let params = ListingParams {
            sort: Some("alphabetical".to_string()),
            ..ListingParams::default()
        };
        assert!(matches!(
            ListingSpec::from_params(params),
            Err(ListingError::UnknownSort(_))
        ));
    }

    #[test]
    fn test_blank_search_collapses_to_none() {
        let params = ListingParams {
            q: Some("   ".to_string()),
            category: Some(String::new()),
            ..ListingParams::default()
        };
        let spec = ListingSpec::from_params(params).expect("valid");
        assert!(spec.search.is_none());
        assert!(spec.category.is_none());
    }

    #[test]
    fn test_offset() {
        let spec = ListingSpec {
            page: 3,
            limit: 12,
            ..ListingSpec::default()
        };
        assert_eq!(spec.offset(), 24);
    }

    #[test]
    fn test_availability_for_inventory() {
        assert_eq!(
            AvailabilityFacet::for_inventory(-1),
            AvailabilityFacet::OutOfStock
        );
        assert_eq!(
            AvailabilityFacet::for_inventory(0),
            AvailabilityFacet::OutOfStock
        );
        assert_eq!(
            AvailabilityFacet::for_inventory(1),
            AvailabilityFacet::LowStock
        );
        assert_eq!(
            AvailabilityFacet::for_inventory(5),
            AvailabilityFacet::LowStock
        );
        assert_eq!(
            AvailabilityFacet::for_inventory(6),
            AvailabilityFacet::InStock
        );
    }

    #[test]
    fn test_seller_tier_for_seller() {
        assert_eq!(SellerTier::for_seller(true, Some(4.8)), SellerTier::TopRated);
        assert_eq!(SellerTier::for_seller(true, Some(4.5)), SellerTier::TopRated);
        assert_eq!(SellerTier::for_seller(true, Some(4.2)), SellerTier::Verified);
        assert_eq!(SellerTier::for_seller(true, None), SellerTier::Verified);
        assert_eq!(SellerTier::for_seller(false, Some(5.0)), SellerTier::Standard);
    }

    #[test]
    fn test_pagination_exact_ceiling() {
        assert_eq!(Pagination::new(1, 12, 0).pages, 0);
        assert_eq!(Pagination::new(1, 12, 1).pages, 1);
        assert_eq!(Pagination::new(1, 12, 12).pages, 1);
        assert_eq!(Pagination::new(1, 12, 13).pages, 2);
        assert_eq!(Pagination::new(1, 12, 15).pages, 2);
        assert_eq!(Pagination::new(2, 5, 11).pages, 3);
    }

    #[test]
    fn test_pagination_empty() {
        let p = Pagination::empty(4, 12);
        assert_eq!(p.page, 4);
        assert_eq!(p.total, 0);
        assert_eq!(p.pages, 0);
    }
}
