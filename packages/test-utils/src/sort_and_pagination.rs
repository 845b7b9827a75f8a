//! Paging and sorting scenarios for listing endpoints

use reqwest::{header::LINK, StatusCode};
use secrest_client::{NameableEntity, SortOrder};

use crate::entity::EntityOperations;
use crate::fixture::RestFixture;

const NAME_FIELD: &str = "name";

/// Make sure at least `count` resources exist
async fn seed<T, O>(fixture: &RestFixture<T, O>, count: usize)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    for _ in 0..count {
        fixture
            .api()
            .create_as_uri(&fixture.create_new_entity(), None)
            .await
            .expect("resource should be created");
    }
}

fn names<T: NameableEntity>(resources: &[T]) -> Vec<&str> {
    resources.iter().map(|r| r.name()).collect()
}

fn is_ordered(names: &[&str], order: SortOrder) -> bool {
    names.windows(2).all(|pair| match order {
        SortOrder::Asc => pair[0] <= pair[1],
        SortOrder::Desc => pair[0] >= pair[1],
    })
}

pub async fn when_first_page_retrieved_then_200<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let response = fixture
        .api()
        .find_paginated_as_response(0, 1)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

pub async fn when_first_page_retrieved_then_at_most_size_items<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    seed(fixture, 3).await;

    let page = fixture.api().find_paginated(0, 2).await.unwrap();

    assert_eq!(page.len(), 2);
}

pub async fn when_page_out_of_bounds_retrieved_then_404<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    seed(fixture, 1).await;

    let response = fixture
        .api()
        .find_paginated_as_response(10_000, 100)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

pub async fn when_page_of_negative_index_retrieved_then_400<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let response = fixture
        .api()
        .find_paginated_as_response(-1, 5)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

pub async fn when_page_of_zero_size_retrieved_then_400<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let response = fixture
        .api()
        .find_paginated_as_response(0, 0)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

pub async fn when_all_sorted_ascending_by_name_then_ordered<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    seed(fixture, 5).await;

    let sorted = fixture
        .api()
        .find_all_sorted(NAME_FIELD, SortOrder::Asc)
        .await
        .unwrap();

    assert!(is_ordered(&names(&sorted), SortOrder::Asc));
}

pub async fn when_all_sorted_descending_by_name_then_ordered<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    seed(fixture, 5).await;

    let sorted = fixture
        .api()
        .find_all_sorted(NAME_FIELD, SortOrder::Desc)
        .await
        .unwrap();

    assert!(is_ordered(&names(&sorted), SortOrder::Desc));
}

pub async fn when_sorted_by_unknown_field_then_400<T, O>(fixture: &RestFixture<T, O>)
where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    let response = fixture
        .api()
        .find_all_sorted_as_response("noSuchField", SortOrder::Asc)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

pub async fn when_paginated_and_sorted_then_each_page_ordered<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    seed(fixture, 6).await;

    let first = fixture
        .api()
        .find_paginated_and_sorted(0, 3, NAME_FIELD, SortOrder::Asc)
        .await
        .unwrap();
    let second = fixture
        .api()
        .find_paginated_and_sorted(1, 3, NAME_FIELD, SortOrder::Asc)
        .await
        .unwrap();

    let mut combined = names(&first);
    combined.extend(names(&second));
    assert_eq!(combined.len(), 6);
    assert!(is_ordered(&combined, SortOrder::Asc));
}

pub async fn when_paginated_and_sorted_then_matches_sorted_listing<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    seed(fixture, 4).await;

    let all = fixture
        .api()
        .find_all_sorted(NAME_FIELD, SortOrder::Desc)
        .await
        .unwrap();
    let page = fixture
        .api()
        .find_paginated_and_sorted(1, 2, NAME_FIELD, SortOrder::Desc)
        .await
        .unwrap();

    assert_eq!(page.as_slice(), &all[2..4]);
}

pub async fn when_paginated_then_total_count_and_links_present<T, O>(
    fixture: &RestFixture<T, O>,
) where
    T: NameableEntity,
    O: EntityOperations<T>,
{
    seed(fixture, 3).await;
    let total = fixture.api().find_all().await.unwrap().len();

    let response = fixture
        .api()
        .find_paginated_as_response(0, 2)
        .await
        .unwrap();

    let total_header = response
        .headers()
        .get("x-total-count")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    assert_eq!(total_header, Some(total));

    let link = response
        .headers()
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(link.contains("rel=\"first\""));
    assert!(link.contains("rel=\"next\""));
    assert!(link.contains("rel=\"last\""));
}

/// Instantiate every sort and pagination scenario as a `#[tokio::test]`
///
/// Works like [`logic_rest_integration_tests!`](crate::logic_rest_integration_tests).
#[macro_export]
macro_rules! sort_and_pagination_rest_integration_tests {
    (@scenarios $fixture:expr; $($scenario:ident),+ $(,)?) => {
        $(
            #[tokio::test]
            async fn $scenario() {
                let fixture = $fixture.await;
                $crate::sort_and_pagination::$scenario(&fixture).await;
            }
        )+
    };
    ($fixture:expr) => {
        $crate::sort_and_pagination_rest_integration_tests!(@scenarios $fixture;
            when_first_page_retrieved_then_200,
            when_first_page_retrieved_then_at_most_size_items,
            when_page_out_of_bounds_retrieved_then_404,
            when_page_of_negative_index_retrieved_then_400,
            when_page_of_zero_size_retrieved_then_400,
            when_all_sorted_ascending_by_name_then_ordered,
            when_all_sorted_descending_by_name_then_ordered,
            when_sorted_by_unknown_field_then_400,
            when_paginated_and_sorted_then_each_page_ordered,
            when_paginated_and_sorted_then_matches_sorted_listing,
            when_paginated_then_total_count_and_links_present,
        );
    };
}
