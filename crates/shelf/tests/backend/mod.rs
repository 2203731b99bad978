use super::*;

#[traced_test]
#[tokio::test]
async fn test_search_annotates_and_caches() -> TestResult {
  let mut server = mockito::Server::new_async().await;
  let mock = mock_catalog(&mut server, "dune", vec![doc(1, "Dune"), doc(2, "Dune Messiah")])
    .expect(1)
    .create_async()
    .await;
  let (shelf, _dir) = create_test_shelf(&server).await?;

  let result = shelf.search("dune", 1, 100).await?;
  assert_eq!(result.total, 2);
  assert_eq!(result.total_pages, 1);
  assert_eq!(result.books[0].cover_url.as_deref(), Some("https://covers.example.org/b/id/1-L.jpg"));

  shelf.set_status("/works/OL2W", ReadingStatus::ToRead, &result.books[1].metadata()).await?;

  // Normalized query hits the cache
  let again = shelf.search("  DUNE ", 1, 100).await?;
  assert_eq!(again.books[1].status, Some(ReadingStatus::ToRead));
  assert_eq!(again.books[0].status, None);

  mock.assert_async().await;
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_catalog_failure_is_not_cached() -> TestResult {
  let mut server = mockito::Server::new_async().await;
  let failing = server
    .mock("GET", "/search.json")
    .match_query(Matcher::Any)
    .with_status(503)
    .expect(2)
    .create_async()
    .await;
  let (shelf, _dir) = create_test_shelf(&server).await?;

  for _ in 0..2 {
    let err = shelf.search("dune", 1, 100).await.unwrap_err();
    assert!(matches!(err, ShelfError::CatalogStatus(503)));
    assert_eq!(err.to_string(), "OpenLibrary API error: 503");
  }
  failing.assert_async().await;
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_status_lifecycle() -> TestResult {
  let server = mockito::Server::new_async().await;
  let (shelf, _dir) = create_test_shelf(&server).await?;
  let metadata = BookMetadata {
    title:              "Dune".into(),
    authors:            vec!["Frank Herbert".into()],
    cover_url:          Some("https://covers.example.org/b/id/1-L.jpg".into()),
    first_publish_year: Some(1965),
  };

  let created = shelf.set_status("/works/OL1W", ReadingStatus::ToRead, &metadata).await?;
  let updated = shelf.set_status("/works/OL1W", ReadingStatus::Completed, &metadata).await?;
  assert_eq!(updated.created_at, created.created_at);

  assert_eq!(shelf.status_counts().await?, StatusCounts { to_read: 0, did_not_finish: 0, completed: 1 });
  let library = shelf.library(ReadingStatus::Completed).await?;
  assert_eq!(library.books[0].metadata(), metadata);

  assert!(shelf.delete_status("/works/OL1W").await?);
  assert!(shelf.get_status("/works/OL1W").await?.is_none());
  assert!(!shelf.delete_status("/works/OL1W").await?);
  assert!(shelf.list_statuses().await?.is_empty());
  Ok(())
}
