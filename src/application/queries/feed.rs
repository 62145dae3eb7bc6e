use crate::domain::entities::Post;
use crate::domain::value_objects::PostId;

/// 無限スクロールフィードの取得状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    HasMore,
    Exhausted,
}

/// クライアント側に蓄積されるページ列とカーソル。
/// カーソルは直前ページ末尾の投稿 id。満杯未満のページを受け取ったら打ち止め。
#[derive(Debug, Clone)]
pub struct InfiniteFeed {
    page_size: usize,
    cursor: Option<PostId>,
    pages: Vec<Vec<Post>>,
    state: FeedState,
}

impl InfiniteFeed {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            cursor: None,
            pages: Vec::new(),
            state: FeedState::HasMore,
        }
    }

    /// 次ページを取りに行くべきか。センチネルが見えていて、検索中でなく、
    /// まだ続きがあるときだけ true。
    pub fn should_fetch(&self, sentinel_visible: bool, search_active: bool) -> bool {
        sentinel_visible && !search_active && self.state == FeedState::HasMore
    }

    pub fn next_cursor(&self) -> Option<&PostId> {
        self.cursor.as_ref()
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    /// 取得したページを取り込み、カーソルと状態を進める。
    pub fn apply_page(&mut self, items: Vec<Post>) {
        if items.len() < self.page_size {
            self.state = FeedState::Exhausted;
        }
        if let Some(last) = items.last() {
            self.cursor = Some(last.id.clone());
        }
        self.pages.push(items);
    }

    /// 取得中に検索が始まっていたら結果を捨てる。取り込めたら true。
    /// 破棄してもカーソルと状態は動かないので、検索解除後に同じページを引き直せる。
    pub fn apply_page_unless_searching(&mut self, items: Vec<Post>, search_active: bool) -> bool {
        if search_active {
            return false;
        }
        self.apply_page(items);
        true
    }

    /// フィード全体の無効化後に呼び、最初のページから読み直す。
    pub fn reset(&mut self) {
        self.cursor = None;
        self.pages.clear();
        self.state = FeedState::HasMore;
    }

    pub fn pages(&self) -> &[Vec<Post>] {
        &self.pages
    }

    pub fn iter_posts(&self) -> impl Iterator<Item = &Post> {
        self.pages.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|page| page.is_empty())
    }
}
