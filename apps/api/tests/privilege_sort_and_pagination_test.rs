//! Paging and sorting scenarios for `/api/privileges`

mod common;

secrest_test_utils::sort_and_pagination_rest_integration_tests!(common::privilege_fixture());
