use bookup_core::db::open_db_in_memory;
use bookup_core::{BookDraft, BookRepository, RepoError, SqliteBookRepository, TitleOrder};

#[test]
fn insert_and_find_book_normalizes_the_isbn() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let stored = repo
        .insert_book(&BookDraft::new("978-0-441-47812-5", "The Left Hand of Darkness"))
        .unwrap();
    assert_eq!(stored.isbn, "9780441478125");

    let by_hyphenated = repo.find_book_by_isbn("978-0-441-47812-5").unwrap().unwrap();
    assert_eq!(by_hyphenated.id, stored.id);

    let by_plain = repo.find_book_by_isbn("9780441478125").unwrap().unwrap();
    assert_eq!(by_plain.id, stored.id);

    assert!(repo.find_book_by_isbn("9999999999999").unwrap().is_none());
}

#[test]
fn duplicate_isbn_insert_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    repo.insert_book(&BookDraft::new("9780441478125", "First")).unwrap();
    let err = repo
        .insert_book(&BookDraft::new("978-0-441-47812-5", "Second"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)), "got {err}");
    assert_eq!(repo.count_books(None).unwrap(), 1);
}

#[test]
fn named_entity_lookup_is_case_insensitive_and_keeps_stored_casing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let author = repo.insert_author("Ursula K. Le Guin").unwrap();
    let found = repo
        .find_author_by_name("  ursula k. le guin ")
        .unwrap()
        .expect("case-folded lookup should hit");
    assert_eq!(found.id, author.id);
    assert_eq!(found.name, "Ursula K. Le Guin");

    assert!(repo.find_author_by_name("someone else").unwrap().is_none());
    assert!(repo.find_category_by_name("  ").unwrap().is_none());
}

#[test]
fn duplicate_association_pair_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let book = repo.insert_book(&BookDraft::new("9780441478125", "Book")).unwrap();
    let author = repo.insert_author("Author").unwrap();

    repo.link_author(book.id, author.id).unwrap();
    let err = repo.link_author(book.id, author.id).unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)), "got {err}");
}

#[test]
fn deleting_a_book_cascades_to_its_association_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let book = repo.insert_book(&BookDraft::new("9780441478125", "Book")).unwrap();
    let author = repo.insert_author("Author").unwrap();
    let tag = repo.insert_tag("classics").unwrap();
    repo.link_author(book.id, author.id).unwrap();
    repo.link_tag(book.id, tag.id).unwrap();

    conn.execute("DELETE FROM books WHERE id = ?1;", [book.id.to_string()])
        .unwrap();

    let written: i64 = conn
        .query_row("SELECT COUNT(*) FROM written;", [], |row| row.get(0))
        .unwrap();
    let tagged: i64 = conn
        .query_row("SELECT COUNT(*) FROM tagged;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(written, 0);
    assert_eq!(tagged, 0);
}

#[test]
fn topic_candidates_cover_categories_and_tags_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let categorized_book = repo
        .insert_book(&BookDraft::new("9780000000001", "Categorized"))
        .unwrap();
    let tagged_book = repo
        .insert_book(&BookDraft::new("9780000000002", "Tagged"))
        .unwrap();
    let unrelated = repo
        .insert_book(&BookDraft::new("9780000000003", "Unrelated"))
        .unwrap();

    let category = repo.insert_category("Science Fiction").unwrap();
    let tag = repo.insert_tag("science fiction").unwrap();
    let other = repo.insert_category("History").unwrap();
    repo.link_category(categorized_book.id, category.id).unwrap();
    repo.link_tag(tagged_book.id, tag.id).unwrap();
    repo.link_category(unrelated.id, other.id).unwrap();

    let ids = repo
        .book_ids_by_topics(&["SCIENCE FICTION".to_string()])
        .unwrap();
    assert!(ids.contains(&categorized_book.id));
    assert!(ids.contains(&tagged_book.id));
    assert!(!ids.contains(&unrelated.id));

    assert!(repo.book_ids_by_topics(&[]).unwrap().is_empty());
}

#[test]
fn author_candidates_match_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let hers = repo.insert_book(&BookDraft::new("9780000000001", "Hers")).unwrap();
    let other = repo.insert_book(&BookDraft::new("9780000000002", "Other")).unwrap();
    let le_guin = repo.insert_author("Ursula K. Le Guin").unwrap();
    let banks = repo.insert_author("Iain M. Banks").unwrap();
    repo.link_author(hers.id, le_guin.id).unwrap();
    repo.link_author(other.id, banks.id).unwrap();

    let ids = repo.book_ids_by_author("ursula k. le guin").unwrap();
    assert_eq!(ids.len(), 1);
    assert!(ids.contains(&hers.id));

    assert!(repo.book_ids_by_author("   ").unwrap().is_empty());
}

#[test]
fn summaries_are_title_ordered_with_stable_pagination() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    for (isbn, title) in [
        ("9780000000001", "banana"),
        ("9780000000002", "Apple"),
        ("9780000000003", "cherry"),
        ("9780000000004", "apricot"),
    ] {
        repo.insert_book(&BookDraft::new(isbn, title)).unwrap();
    }

    let asc = repo.list_summaries(TitleOrder::Asc, 0, 10, None).unwrap();
    let titles: Vec<&str> = asc.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Apple", "apricot", "banana", "cherry"]);

    let desc = repo.list_summaries(TitleOrder::Desc, 0, 10, None).unwrap();
    let titles: Vec<&str> = desc.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["cherry", "banana", "apricot", "Apple"]);

    let first_page = repo.list_summaries(TitleOrder::Asc, 0, 2, None).unwrap();
    let second_page = repo.list_summaries(TitleOrder::Asc, 2, 2, None).unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(second_page.len(), 2);
    for summary in &first_page {
        assert!(
            second_page.iter().all(|other| other.id != summary.id),
            "pages overlap on {}",
            summary.title
        );
    }
}

#[test]
fn summary_topics_merge_category_and_tag_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let book = repo.insert_book(&BookDraft::new("9780441478125", "Book")).unwrap();
    let category = repo.insert_category("Science Fiction").unwrap();
    let tag = repo.insert_tag("classics").unwrap();
    repo.link_category(book.id, category.id).unwrap();
    repo.link_tag(book.id, tag.id).unwrap();

    let summaries = repo.list_summaries(TitleOrder::Asc, 0, 10, None).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(
        summaries[0].topics,
        vec!["classics".to_string(), "Science Fiction".to_string()]
    );
}

#[test]
fn detail_projection_carries_authors_and_topics() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let mut draft = BookDraft::new("9780441478125", "The Left Hand of Darkness");
    draft.description = Some("A story of Gethen.".to_string());
    draft.published_year = Some(1969);
    let book = repo.insert_book(&draft).unwrap();

    let author = repo.insert_author("Ursula K. Le Guin").unwrap();
    let category = repo.insert_category("Science Fiction").unwrap();
    repo.link_author(book.id, author.id).unwrap();
    repo.link_category(book.id, category.id).unwrap();

    let detail = repo
        .get_detail_by_isbn("978-0-441-47812-5")
        .unwrap()
        .expect("detail should resolve");
    assert_eq!(detail.id, book.id);
    assert_eq!(detail.description.as_deref(), Some("A story of Gethen."));
    assert_eq!(detail.published_year, Some(1969));
    assert_eq!(detail.authors, vec!["Ursula K. Le Guin".to_string()]);
    assert_eq!(detail.topics, vec!["Science Fiction".to_string()]);
}

#[test]
fn candidate_restriction_applies_to_count_and_listing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let kept = repo.insert_book(&BookDraft::new("9780000000001", "Kept")).unwrap();
    repo.insert_book(&BookDraft::new("9780000000002", "Dropped")).unwrap();

    let candidates = std::iter::once(kept.id).collect();
    assert_eq!(repo.count_books(Some(&candidates)).unwrap(), 1);
    let listed = repo
        .list_summaries(TitleOrder::Asc, 0, 10, Some(&candidates))
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, kept.id);

    let empty = std::collections::BTreeSet::new();
    assert_eq!(repo.count_books(Some(&empty)).unwrap(), 0);
    assert!(repo
        .list_summaries(TitleOrder::Asc, 0, 10, Some(&empty))
        .unwrap()
        .is_empty());
}

#[test]
fn topic_names_union_is_distinct_and_searchable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    repo.insert_category("Science Fiction").unwrap();
    repo.insert_category("History").unwrap();
    repo.insert_tag("Science Fiction").unwrap();
    repo.insert_tag("classics").unwrap();

    let names = repo.topic_names().unwrap();
    assert_eq!(
        names,
        vec![
            "classics".to_string(),
            "History".to_string(),
            "Science Fiction".to_string()
        ]
    );

    let matched = repo.search_topic_names("science", 6).unwrap();
    assert_eq!(matched, vec!["Science Fiction".to_string()]);

    let capped = repo.search_topic_names("", 2).unwrap();
    assert_eq!(capped.len(), 2);
}
