use super::*;

/// 23 hits for "dune", a single page at the client's page size.
fn dune_docs() -> Vec<serde_json::Value> { (1..=23).map(|id| doc(id, &format!("Dune {id}"))).collect() }

#[traced_test]
#[tokio::test]
async fn test_trailing_space_resets_debounce() -> TestResult {
  let mut server = mockito::Server::new_async().await;
  let _catalog = mock_catalog(&mut server, "dune", dune_docs()).create_async().await;
  let (shelf, _dir) = create_test_shelf(&server).await?;
  let api = RecordingApi::new(shelf);
  let mut app = create_test_app(api.clone(), "/");
  app.mount().await;

  app.type_query("dune");
  app.next_debounced().await.unwrap().await?;
  let state = app.search_state();
  assert_eq!((state.total, state.page, state.total_pages), (23, 1, 1));

  app.type_query("dune");
  app.type_query("dune ");
  app.next_debounced().await.unwrap().await?;

  assert_eq!(api.searches(), vec![("dune".to_string(), 1), ("dune".to_string(), 1)]);
  assert_eq!(app.history().entries(), ["/", "/?q=dune"]);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_undo_round_trip() -> TestResult {
  let mut server = mockito::Server::new_async().await;
  let _catalog = mock_catalog(&mut server, "dune", vec![doc(1, "Dune")]).create_async().await;
  let (shelf, _dir) = create_test_shelf(&server).await?;
  let api = RecordingApi::new(shelf.clone());
  let mut app = create_test_app(api, "/?q=dune");
  app.mount().await.unwrap().await?;

  let dune = app.search_state().books[0].clone();
  app.change_status(&dune, ReadingStatus::ToRead).await.unwrap();

  let dune = app.search_state().books[0].clone();
  let toast = app.change_status(&dune, ReadingStatus::Completed).await.unwrap();
  assert_eq!(toast.previous_status, Some(ReadingStatus::ToRead));
  assert_eq!(shelf.get_status("/works/OL1W").await?.unwrap().status, ReadingStatus::Completed);

  app.undo(&toast).await;
  let record = shelf.get_status("/works/OL1W").await?.unwrap();
  assert_eq!(record.status, ReadingStatus::ToRead);
  assert_eq!(record.metadata, dune.metadata());
  assert_eq!(app.search_state().books[0].status, Some(ReadingStatus::ToRead));
  assert!(app.toast().is_none());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_undo_without_previous_status_deletes() -> TestResult {
  let mut server = mockito::Server::new_async().await;
  let _catalog = mock_catalog(&mut server, "dune", vec![doc(1, "Dune")]).create_async().await;
  let (shelf, _dir) = create_test_shelf(&server).await?;
  let mut app = create_test_app(RecordingApi::new(shelf.clone()), "/?q=dune");
  app.mount().await.unwrap().await?;

  let dune = app.search_state().books[0].clone();
  let toast = app.change_status(&dune, ReadingStatus::DidNotFinish).await.unwrap();
  assert_eq!(toast.previous_status, None);

  app.undo(&toast).await;
  assert!(shelf.get_status("/works/OL1W").await?.is_none());
  assert_eq!(app.search_state().books[0].status, None);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_routing_round_trip() -> TestResult {
  let mut server = mockito::Server::new_async().await;
  let _catalog = mock_catalog(&mut server, "foo", vec![doc(7, "Foo")]).create_async().await;
  let (shelf, _dir) = create_test_shelf(&server).await?;
  let foo = shelf.search("foo", 1, 100).await?.books.remove(0);
  shelf.set_status(&foo.work_key, ReadingStatus::Completed, &foo.metadata()).await?;

  let mut app = create_test_app(RecordingApi::new(shelf), "/?q=foo");
  app.mount().await.unwrap().await?;

  app.navigate(Route::Library { status: ReadingStatus::Completed }).await;
  assert_eq!(app.library().books.len(), 1);
  assert_eq!(app.library().counts.completed, 1);

  app.back().await.unwrap().await?;
  assert_eq!(app.route(), &Route::Discover { query: "foo".into() });
  assert_eq!(app.search_state().books[0].status, Some(ReadingStatus::Completed));
  assert_eq!(app.history().entries(), ["/?q=foo", "/library/completed"]);

  app.forward().await;
  assert_eq!(app.route(), &Route::Library { status: ReadingStatus::Completed });
  assert_eq!(app.history().entries().len(), 2);
  Ok(())
}
