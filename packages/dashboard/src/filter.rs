//! Pure filtering and sorting over the client's request list.
//!
//! The list view re-runs this on every keystroke, so it never touches the
//! backend: the caller fetches once and filters locally.

use mindtoweb_core::{RequestStatus, ServiceRequest};

/// Sort order for the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    Oldest,
}

/// Status filter for the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Status(RequestStatus),
}

impl StatusFilter {
    fn matches(&self, request: &ServiceRequest) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Status(status) => &request.status == status,
        }
    }
}

/// Applies the list view's search, status filter, and sort.
///
/// The query matches case-insensitively against the project title and the
/// business name; a blank query matches everything. Ties in `created_at`
/// keep their input order.
pub fn filter_requests(
    requests: &[ServiceRequest],
    query: &str,
    status: &StatusFilter,
    order: SortOrder,
) -> Vec<ServiceRequest> {
    let needle = query.trim().to_lowercase();

    let mut matched: Vec<ServiceRequest> = requests
        .iter()
        .filter(|r| status.matches(r))
        .filter(|r| {
            needle.is_empty()
                || r.project_title.to_lowercase().contains(&needle)
                || r.business_name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    match order {
        SortOrder::Newest => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => matched.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mindtoweb_core::{BudgetRange, ProjectTimeline, ServiceType, UrgencyLevel};
    use pretty_assertions::assert_eq;

    fn request(id: &str, title: &str, business: &str, status: RequestStatus, day: u32) -> ServiceRequest {
        ServiceRequest {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            project_title: title.to_string(),
            business_name: business.to_string(),
            industry: String::new(),
            website_url: String::new(),
            service_type: ServiceType::WebsiteDevelopment,
            budget_range: BudgetRange::Under500,
            expected_timeline: ProjectTimeline::Flexible,
            urgency_level: UrgencyLevel::Low,
            description: String::new(),
            goals: String::new(),
            target_audience: String::new(),
            key_features: String::new(),
            inspiration_links: String::new(),
            additional_notes: String::new(),
            status,
            created_at: Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<ServiceRequest> {
        vec![
            request("a", "AI Shop", "Acme", RequestStatus::PendingReview, 1),
            request("b", "Brand refresh", "Blue Bakery", RequestStatus::InProgress, 3),
            request("c", "New website", "acme labs", RequestStatus::Completed, 2),
        ]
    }

    #[test]
    fn query_matches_title_and_business_name_case_insensitively() {
        let requests = sample();

        let by_title = filter_requests(&requests, "ai shop", &StatusFilter::All, SortOrder::Newest);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, "a");

        // "ACME" hits one row by business name and one by its lowercase twin.
        let by_business = filter_requests(&requests, "ACME", &StatusFilter::All, SortOrder::Newest);
        let ids: Vec<&str> = by_business.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn blank_query_matches_everything() {
        let requests = sample();
        assert_eq!(
            filter_requests(&requests, "", &StatusFilter::All, SortOrder::Newest).len(),
            3
        );
        assert_eq!(
            filter_requests(&requests, "   ", &StatusFilter::All, SortOrder::Newest).len(),
            3
        );
    }

    #[test]
    fn status_filter_composes_with_the_query() {
        let requests = sample();

        let completed = filter_requests(
            &requests,
            "",
            &StatusFilter::Status(RequestStatus::Completed),
            SortOrder::Newest,
        );
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, "c");

        let none = filter_requests(
            &requests,
            "bakery",
            &StatusFilter::Status(RequestStatus::Completed),
            SortOrder::Newest,
        );
        assert!(none.is_empty());
    }

    #[test]
    fn sort_order_flips_the_list() {
        let requests = sample();

        let newest = filter_requests(&requests, "", &StatusFilter::All, SortOrder::Newest);
        let ids: Vec<&str> = newest.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        let oldest = filter_requests(&requests, "", &StatusFilter::All, SortOrder::Oldest);
        let ids: Vec<&str> = oldest.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn input_is_never_mutated() {
        let requests = sample();
        let before: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();
        let _ = filter_requests(&requests, "acme", &StatusFilter::All, SortOrder::Oldest);
        let after: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();
        assert_eq!(before, after);
    }
}
