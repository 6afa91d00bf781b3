//! News repository.

use super::types::{NewNews, News, NewsSummary};
use crate::db::DbPool;
use crate::{NoteboardError, Result};

/// Repository for news items.
pub struct NewsRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> NewsRepository<'a> {
    /// Create a new NewsRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Publish a news item.
    pub async fn create(&self, new_news: &NewNews) -> Result<News> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO news (title, text, date) VALUES (?, ?, ?) RETURNING id")
                .bind(&new_news.title)
                .bind(&new_news.text)
                .bind(new_news.date)
                .fetch_one(self.pool)
                .await
                .map_err(|e| NoteboardError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| NoteboardError::NotFound("news".to_string()))
    }

    /// Publish many news items in one transaction.
    ///
    /// Returns the new IDs in input order.
    pub async fn bulk_create(&self, items: &[NewNews]) -> Result<Vec<i64>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;

        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO news (title, text, date) VALUES (?, ?, ?) RETURNING id",
            )
            .bind(&item.title)
            .bind(&item.text)
            .bind(item.date)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
            ids.push(id);
        }

        tx.commit()
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(ids)
    }

    /// Get a news item by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<News>> {
        let news = sqlx::query_as::<_, News>("SELECT id, title, text, date FROM news WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;

        Ok(news)
    }

    /// List news newest first, with comment counts.
    ///
    /// Items sharing a date are ordered by descending ID.
    pub async fn list_paginated(&self, offset: i64, limit: i64) -> Result<Vec<NewsSummary>> {
        let items = sqlx::query_as::<_, NewsSummary>(
            "SELECT n.id, n.title, n.text, n.date,
                    (SELECT COUNT(*) FROM comments c WHERE c.news_id = n.id) AS comment_count
             FROM news n
             ORDER BY n.date DESC, n.id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await
        .map_err(|e| NoteboardError::Database(e.to_string()))?;

        Ok(items)
    }

    /// Count all news items.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM news")
            .fetch_one(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(count.0)
    }

    /// Delete a news item and its comments.
    ///
    /// Returns true if a news item was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| NoteboardError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use chrono::{Duration, NaiveDate, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = NewsRepository::new(db.pool());

        let news = repo
            .create(&NewNews::new("Заголовок", "Текст").with_date(day(5)))
            .await
            .unwrap();
        assert_eq!(news.title, "Заголовок");
        assert_eq!(news.date, day(5));
        assert_eq!(repo.get_by_id(news.id).await.unwrap(), Some(news));
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_default_date_is_today() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = NewsRepository::new(db.pool());

        let news = repo.create(&NewNews::new("Title", "Text")).await.unwrap();
        assert_eq!(news.date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = NewsRepository::new(db.pool());
        let today = Utc::now().date_naive();

        let items: Vec<NewNews> = (0..11)
            .map(|i| NewNews::new(format!("Новость {i}"), "Текст").with_date(today - Duration::days(i)))
            .collect();
        repo.bulk_create(&items).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 11);

        let page = repo.list_paginated(0, 10).await.unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(page[0].date, today);
        assert!(page.windows(2).all(|w| w[0].date >= w[1].date));

        let rest = repo.list_paginated(10, 10).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].title, "Новость 10");
    }

    #[tokio::test]
    async fn test_same_date_orders_by_id_desc() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = NewsRepository::new(db.pool());

        let first = repo.create(&NewNews::new("A", "t").with_date(day(1))).await.unwrap();
        let second = repo.create(&NewNews::new("B", "t").with_date(day(1))).await.unwrap();

        let page = repo.list_paginated(0, 10).await.unwrap();
        assert_eq!(page[0].id, second.id);
        assert_eq!(page[1].id, first.id);
        assert_eq!(page[0].comment_count, 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = NewsRepository::new(db.pool());
        let news = repo.create(&NewNews::new("Title", "Text")).await.unwrap();

        assert!(repo.delete(news.id).await.unwrap());
        assert!(!repo.delete(news.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
