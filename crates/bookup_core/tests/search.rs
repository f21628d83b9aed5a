use bookup_core::db::open_db_in_memory;
use bookup_core::search::composer::{search, search_by_categories};
use bookup_core::{
    BookDraft, BookRepository, BookSearchQuery, SearchError, SqliteBookRepository, TitleOrder,
};
use rusqlite::Connection;

/// Seeds a small catalog:
/// - "A Wizard of Earthsea" (Le Guin, category Fantasy)
/// - "The Dispossessed" (Le Guin, category Science Fiction)
/// - "Use of Weapons" (Banks, tag science fiction)
/// - "Plain Listing" (no links)
fn seed_catalog(conn: &Connection) {
    let repo = SqliteBookRepository::try_new(conn).unwrap();

    let earthsea = repo
        .insert_book(&BookDraft::new("9780000000001", "A Wizard of Earthsea"))
        .unwrap();
    let dispossessed = repo
        .insert_book(&BookDraft::new("9780000000002", "The Dispossessed"))
        .unwrap();
    let weapons = repo
        .insert_book(&BookDraft::new("9780000000003", "Use of Weapons"))
        .unwrap();
    repo.insert_book(&BookDraft::new("9780000000004", "Plain Listing"))
        .unwrap();

    let le_guin = repo.insert_author("Ursula K. Le Guin").unwrap();
    let banks = repo.insert_author("Iain M. Banks").unwrap();
    repo.link_author(earthsea.id, le_guin.id).unwrap();
    repo.link_author(dispossessed.id, le_guin.id).unwrap();
    repo.link_author(weapons.id, banks.id).unwrap();

    let fantasy = repo.insert_category("Fantasy").unwrap();
    let sci_fi_category = repo.insert_category("Science Fiction").unwrap();
    let sci_fi_tag = repo.insert_tag("science fiction").unwrap();
    repo.link_category(earthsea.id, fantasy.id).unwrap();
    repo.link_category(dispossessed.id, sci_fi_category.id).unwrap();
    repo.link_tag(weapons.id, sci_fi_tag.id).unwrap();
}

#[test]
fn unfiltered_search_lists_the_whole_catalog_in_title_order() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let page = search(&repo, &BookSearchQuery::default()).unwrap();
    assert_eq!(page.total, 4);
    let titles: Vec<&str> = page.items.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "A Wizard of Earthsea",
            "Plain Listing",
            "The Dispossessed",
            "Use of Weapons"
        ]
    );
}

#[test]
fn topic_filter_matches_categories_and_tags_alike() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let page = search(
        &repo,
        &BookSearchQuery {
            topics: vec!["SCIENCE FICTION".to_string()],
            ..BookSearchQuery::default()
        },
    )
    .unwrap();

    assert_eq!(page.total, 2);
    let titles: Vec<&str> = page.items.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["The Dispossessed", "Use of Weapons"]);
    for item in &page.items {
        assert!(item
            .topics
            .iter()
            .any(|topic| topic.eq_ignore_ascii_case("science fiction")));
    }
}

#[test]
fn author_and_topic_filters_intersect() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let page = search(
        &repo,
        &BookSearchQuery {
            author: Some("ursula k. le guin".to_string()),
            topics: vec!["science fiction".to_string()],
            ..BookSearchQuery::default()
        },
    )
    .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "The Dispossessed");
}

#[test]
fn empty_facet_intersection_is_an_empty_page_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let page = search(
        &repo,
        &BookSearchQuery {
            author: Some("Iain M. Banks".to_string()),
            topics: vec!["Fantasy".to_string()],
            ..BookSearchQuery::default()
        },
    )
    .unwrap();

    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

#[test]
fn blank_facet_values_are_treated_as_absent() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let page = search(
        &repo,
        &BookSearchQuery {
            author: Some("   ".to_string()),
            topics: vec!["  ".to_string(), String::new()],
            ..BookSearchQuery::default()
        },
    )
    .unwrap();
    assert_eq!(page.total, 4);
}

#[test]
fn pagination_is_disjoint_and_union_equals_the_unpaginated_set() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let unpaginated = search(
        &repo,
        &BookSearchQuery {
            take: Some(100),
            ..BookSearchQuery::default()
        },
    )
    .unwrap();

    let first = search(
        &repo,
        &BookSearchQuery {
            skip: 0,
            take: Some(2),
            ..BookSearchQuery::default()
        },
    )
    .unwrap();
    let second = search(
        &repo,
        &BookSearchQuery {
            skip: 2,
            take: Some(2),
            ..BookSearchQuery::default()
        },
    )
    .unwrap();

    let mut combined: Vec<_> = first.items.iter().map(|s| s.id).collect();
    combined.extend(second.items.iter().map(|s| s.id));
    let expected: Vec<_> = unpaginated.items.iter().map(|s| s.id).collect();
    assert_eq!(combined, expected);

    for item in &first.items {
        assert!(second.items.iter().all(|other| other.id != item.id));
    }
}

#[test]
fn descending_order_reverses_the_ascending_listing() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let asc = search(
        &repo,
        &BookSearchQuery {
            order: TitleOrder::Asc,
            ..BookSearchQuery::default()
        },
    )
    .unwrap();
    let desc = search(
        &repo,
        &BookSearchQuery {
            order: TitleOrder::Desc,
            ..BookSearchQuery::default()
        },
    )
    .unwrap();

    let mut reversed: Vec<_> = desc.items.iter().map(|s| s.title.clone()).collect();
    reversed.reverse();
    let ascending: Vec<_> = asc.items.iter().map(|s| s.title.clone()).collect();
    assert_eq!(reversed, ascending);
}

#[test]
fn category_search_requires_at_least_one_usable_token() {
    let conn = open_db_in_memory().unwrap();
    seed_catalog(&conn);
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let err = search_by_categories(&repo, &[], 0, None, TitleOrder::Asc).unwrap_err();
    assert!(matches!(err, SearchError::NoCategories));

    let blank_only = vec!["  ".to_string(), String::new()];
    let err = search_by_categories(&repo, &blank_only, 0, None, TitleOrder::Asc).unwrap_err();
    assert!(matches!(err, SearchError::NoCategories));

    let page = search_by_categories(
        &repo,
        &["Fantasy".to_string(), "science fiction".to_string()],
        0,
        None,
        TitleOrder::Asc,
    )
    .unwrap();
    assert_eq!(page.total, 3);
}

#[test]
fn default_take_caps_large_catalogs_at_fifteen() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    for index in 0..20 {
        repo.insert_book(&BookDraft::new(
            format!("978000000{index:04}"),
            format!("Book {index:02}"),
        ))
        .unwrap();
    }

    let page = search(&repo, &BookSearchQuery::default()).unwrap();
    assert_eq!(page.total, 20);
    assert_eq!(page.items.len(), 15);
}
