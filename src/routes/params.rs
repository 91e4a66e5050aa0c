use sea_orm::QuerySelect;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
    pub offset: i64,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, default 1. Without `page` and `per_page` every record
    /// is returned.
    pub page: Option<i64>,
    /// Items per page, default 20, at most 100
    pub per_page: Option<i64>,
}

impl Pagination {
    /// The requested page, or `None` when the caller asked for no paging.
    pub fn normalize(&self) -> Option<PageWindow> {
        if self.page.is_none() && self.per_page.is_none() {
            return None;
        }
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        Some(PageWindow {
            page,
            per_page,
            offset,
        })
    }
}

/// Limit `query` to `window`, or leave it whole.
pub fn paginate<Q: QuerySelect>(query: Q, window: Option<&PageWindow>) -> Q {
    match window {
        Some(window) => query
            .limit(window.per_page as u64)
            .offset(window.offset as u64),
        None => query,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub enum HotelSortBy {
    /// Base price ascending
    #[serde(rename = "priceAsc")]
    PriceAsc,
    /// Base price descending
    #[serde(rename = "priceDesc")]
    PriceDesc,
    /// Ratings descending
    #[serde(rename = "rating")]
    Rating,
}

/// Listing search filters. All given filters must hold; `search_query`
/// matches the hotel name or the location name.
#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HotelSearchQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Case-insensitive substring of the hotel or location name
    pub search_query: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rooms: Option<i32>,
    pub max_rooms: Option<i32>,
    /// Exact property type, e.g. `Resort`
    pub property_type: Option<String>,
    pub sort_by: Option<HotelSortBy>,
}

impl HotelSearchQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let window = Pagination {
            page: Some(0),
            per_page: Some(500),
        }
        .normalize();
        assert_eq!(
            window,
            Some(PageWindow {
                page: 1,
                per_page: 100,
                offset: 0
            })
        );

        let window = Pagination {
            page: Some(3),
            per_page: None,
        }
        .normalize();
        assert_eq!(window.map(|w| w.offset), Some(40));
    }

    #[test]
    fn no_paging_parameters_means_everything() {
        assert_eq!(Pagination::default().normalize(), None);
        assert_eq!(HotelSearchQuery::default().pagination().normalize(), None);
    }

    #[test]
    fn huge_page_numbers_saturate() {
        let window = Pagination {
            page: Some(i64::MAX),
            per_page: Some(100),
        }
        .normalize()
        .expect("window");
        assert_eq!(window.offset, i64::MAX);
    }

    #[test]
    fn sort_keys_use_listing_names() {
        let sort: HotelSortBy = serde_json::from_str("\"priceDesc\"").unwrap();
        assert_eq!(sort, HotelSortBy::PriceDesc);
        assert!(serde_json::from_str::<HotelSortBy>("\"price_desc\"").is_err());
    }
}
