// ==========================================
// 学生名册管理系统 - 学生持久化端口 (Trait)
// ==========================================
// 职责: 定义与存储无关的 CRUD 原语
// 红线: Repository 不含业务规则，只做数据 CRUD
// 实现者: SqliteStudentRepository（rusqlite）/ InMemoryStudentRepository
// ==========================================

use crate::domain::student::Student;
use crate::domain::types::StudentStatus;
use crate::repository::error::RepositoryResult;

// ==========================================
// StudentRepository Trait
// ==========================================
// 原子粒度: 单行；不提供跨行事务
pub trait StudentRepository: Send + Sync {
    /// 插入新学生
    ///
    /// # 返回
    /// - Err(DuplicateKey): student_id 已存在
    fn create(&self, student: &Student) -> RepositoryResult<()>;

    /// 读取全部学生（每次调用都是新快照，无缓存契约）
    fn list_all(&self) -> RepositoryResult<Vec<Student>>;

    /// 按 student_id 覆写 full_name / programme / gpa / phone_number / status
    ///
    /// # 返回
    /// - Err(NotFound): 无匹配行
    fn update(&self, student: &Student) -> RepositoryResult<()>;

    /// 仅写入状态（阈值对账专用）
    ///
    /// # 返回
    /// - Err(NotFound): 影响行数为 0
    fn update_status(&self, student_id: &str, status: StudentStatus) -> RepositoryResult<()>;

    /// 删除学生
    ///
    /// # 返回
    /// - Err(NotFound): 影响行数为 0（重复删除不会静默成功）
    fn delete(&self, student_id: &str) -> RepositoryResult<()>;
}
