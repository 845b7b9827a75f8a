//! Search round trips through the privilege client
//!
//! Names that look like search syntax must still be found by an exact
//! match against the running server.

mod common;

use rstest::rstest;
use secrest_client::{ClientOperation, Constraint, PrivilegeClient, SearchField};

use common::TestServer;

async fn seeded_client(names: &[&str]) -> (TestServer, PrivilegeClient) {
    let server = TestServer::spawn().await;
    let client = server.client();
    for name in names {
        client
            .create(&secrest_client::Privilege::new(*name))
            .await
            .unwrap();
    }
    (server, client)
}

async fn find_by_name(client: &PrivilegeClient, name: &str) -> Option<String> {
    client
        .search_one(Constraint::new(SearchField::Name, ClientOperation::Eq, name))
        .await
        .unwrap()
        .map(|privilege| privilege.name)
}

#[rstest]
#[case("READ ")]
#[case("READ")]
#[case(" READ")]
#[case("AB*")]
#[case("*AB")]
#[case("ABC")]
#[case("a,b")]
#[case(r"a\b")]
#[tokio::test]
async fn test_exact_search_finds_only_that_name(#[case] name: &str) {
    let (_server, client) = seeded_client(&[
        "READ ", "READ", " READ", "AB*", "*AB", "ABC", "a,b", "a", r"a\b",
    ])
    .await;

    assert_eq!(find_by_name(&client, name).await.as_deref(), Some(name));
}

#[tokio::test]
async fn test_negated_exact_search_excludes_only_that_name() {
    let (_server, client) = seeded_client(&["AB*", "ABC", "ABD"]).await;

    let others = client
        .search_all(&[Constraint::new(
            SearchField::Name,
            ClientOperation::NegEq,
            "AB*",
        )])
        .await
        .unwrap();

    let mut names: Vec<_> = others.into_iter().map(|p| p.name).collect();
    names.sort();
    assert_eq!(names, vec!["ABC", "ABD"]);
}

#[tokio::test]
async fn test_contains_search_with_literal_wildcard() {
    let (_server, client) = seeded_client(&["AB*", "ABC", "X*Y"]).await;

    let found = client
        .search_all(&[Constraint::new(
            SearchField::Name,
            ClientOperation::Contains,
            "*",
        )])
        .await
        .unwrap();

    let mut names: Vec<_> = found.into_iter().map(|p| p.name).collect();
    names.sort();
    assert_eq!(names, vec!["AB*", "X*Y"]);
}
