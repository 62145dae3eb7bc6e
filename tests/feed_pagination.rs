use std::collections::HashSet;
use tsumugi::domain::entities::PostDraft;
use tsumugi::domain::value_objects::{ImageUpload, UserId};
use tsumugi::{AppState, FeedState};

async fn seed_posts(state: &AppState, creator: &UserId, count: usize) {
    for i in 0..count {
        let draft = PostDraft {
            creator: creator.clone(),
            caption: format!("caption number {i:02}"),
            image: ImageUpload::new(format!("photo-{i}.png"), "image/png", vec![i as u8; 8]),
            location: "Kyoto".into(),
            tags: "travel, japan".into(),
        };
        state.client.create_post(&draft).await.expect("seed post");
    }
}

#[tokio::test]
async fn fifteen_posts_paginate_as_three_pages() {
    let state = AppState::default();
    let creator = UserId::generate();
    seed_posts(&state, &creator, 15).await;

    let mut feed = state.client.new_feed();
    let mut fetches = 0;
    while feed.should_fetch(true, false) {
        state.client.fetch_next_page(&mut feed).await.expect("page");
        fetches += 1;
        assert!(fetches <= 3, "feed must exhaust after three pages");
    }

    let lens: Vec<usize> = feed.pages().iter().map(Vec::len).collect();
    assert_eq!(lens, vec![6, 6, 3]);
    assert_eq!(feed.state(), FeedState::Exhausted);

    // どの投稿も1回ずつ
    let ids: HashSet<_> = feed.iter_posts().map(|post| post.id.clone()).collect();
    assert_eq!(ids.len(), 15);
}

#[tokio::test]
async fn page_size_multiple_needs_an_empty_page_to_exhaust() {
    let state = AppState::default();
    let creator = UserId::generate();
    seed_posts(&state, &creator, 12).await;

    let mut feed = state.client.new_feed();
    state.client.fetch_next_page(&mut feed).await.expect("page 1");
    state.client.fetch_next_page(&mut feed).await.expect("page 2");

    // 2ページとも満杯なので、続きがあるように見える
    assert_eq!(feed.state(), FeedState::HasMore);
    assert!(feed.should_fetch(true, false));

    state.client.fetch_next_page(&mut feed).await.expect("page 3");
    assert_eq!(feed.state(), FeedState::Exhausted);
    assert_eq!(feed.iter_posts().count(), 12);
    assert!(feed.pages().last().map(Vec::is_empty).unwrap_or(false));
}

#[tokio::test]
async fn fetch_is_suppressed_while_searching() {
    let state = AppState::default();
    let creator = UserId::generate();
    seed_posts(&state, &creator, 8).await;

    let feed = state.client.new_feed();
    assert!(feed.should_fetch(true, false));
    assert!(!feed.should_fetch(true, true));
    assert!(!feed.should_fetch(false, false));
}

#[tokio::test]
async fn liking_a_post_marks_the_feed_for_a_restart() {
    let state = AppState::default();
    let creator = UserId::generate();
    seed_posts(&state, &creator, 9).await;

    let mut feed = state.client.new_feed();
    state.client.fetch_next_page(&mut feed).await.expect("page 1");
    state.client.fetch_next_page(&mut feed).await.expect("page 2");
    assert_eq!(feed.iter_posts().count(), 9);

    let liked = feed.iter_posts().next().expect("have posts").id.clone();
    state
        .client
        .like_post(&liked, vec![UserId::generate()])
        .await
        .expect("like");

    // 失効したフィードは最初のページから読み直される
    state.client.sync_feed(&mut feed).await.expect("sync");
    assert_eq!(feed.pages().len(), 1);
    assert_eq!(feed.pages()[0].len(), 6);

    // 同期済みのフィードをもう一度同期しても何も起きない
    state.client.sync_feed(&mut feed).await.expect("sync again");
    assert_eq!(feed.pages().len(), 1);
}

#[tokio::test]
async fn empty_feed_exhausts_on_the_first_page() {
    let state = AppState::default();
    let mut feed = state.client.new_feed();

    state.client.fetch_next_page(&mut feed).await.expect("page");
    assert_eq!(feed.state(), FeedState::Exhausted);
    assert!(feed.is_empty());
    assert!(feed.next_cursor().is_none());
}
