// ==========================================
// 人员配置预测系统 - 月度产能历史仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 主键: (year, month), 重算结果覆盖旧值
// ==========================================

use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::domain::capacity::MonthlyCapacity;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;

const SELECT_COLUMNS: &str = r#"
    SELECT
        year, month, optimal_capacity, max_productivity, min_productivity,
        active_workers, total_production, real_workers
    FROM monthly_capacity
"#;

fn map_row(row: &Row<'_>) -> SqliteResult<MonthlyCapacity> {
    Ok(MonthlyCapacity {
        year: row.get(0)?,
        month: row.get(1)?,
        optimal_capacity: row.get(2)?,
        max_productivity: row.get(3)?,
        min_productivity: row.get(4)?,
        active_workers: row.get(5)?,
        total_production: row.get(6)?,
        real_workers: row.get(7)?,
    })
}

// ==========================================
// MonthlyCapacityRepository - 月度产能仓储
// ==========================================
/// 职责: 管理 monthly_capacity 表的读写
pub struct MonthlyCapacityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MonthlyCapacityRepository {
    /// 打开数据库并确保表结构存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Err(SchemaVersionMismatch): 库由更新版本写入
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        if let Some(found) = read_schema_version(&conn)? {
            if found > CURRENT_SCHEMA_VERSION {
                return Err(RepositoryError::SchemaVersionMismatch {
                    found,
                    expected: CURRENT_SCHEMA_VERSION,
                });
            }
        }
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量插入或更新
    ///
    /// # 返回
    /// - Ok(usize): 写入的记录数
    ///
    /// # 说明
    /// - INSERT OR REPLACE 实现 upsert 语义
    /// - 单事务, 任一行失败则整体回滚
    pub fn upsert_batch(&self, rows: &[MonthlyCapacity]) -> RepositoryResult<usize> {
        if let Some(bad) = rows.iter().find(|r| !r.period().is_valid()) {
            return Err(RepositoryError::FieldValueError {
                field: "month".to_string(),
                message: format!("月份越界: {}", bad.period()),
            });
        }

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let updated_at = Utc::now().to_rfc3339();

        let mut count = 0;
        for row in rows {
            count += tx.execute(
                r#"
                INSERT OR REPLACE INTO monthly_capacity (
                    year, month, optimal_capacity, max_productivity, min_productivity,
                    active_workers, total_production, real_workers, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    row.year,
                    row.month,
                    row.optimal_capacity,
                    row.max_productivity,
                    row.min_productivity,
                    row.active_workers,
                    row.total_production,
                    row.real_workers,
                    updated_at,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(count = count, "月度产能写入完成");
        Ok(count)
    }

    /// 查询全部月份 (按年月升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<MonthlyCapacity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY year, month", SELECT_COLUMNS))?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<MonthlyCapacity>>>()?;
        Ok(rows)
    }

    /// 按年月查询
    ///
    /// # 返回
    /// - Ok(None): 未找到
    pub fn find(&self, year: i32, month: u32) -> RepositoryResult<Option<MonthlyCapacity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} WHERE year = ?1 AND month = ?2", SELECT_COLUMNS))?;
        let row = stmt
            .query_row(params![year, month], map_row)
            .optional()?;
        Ok(row)
    }
}
