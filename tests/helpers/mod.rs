// ==========================================
// 集成测试共享辅助模块
// ==========================================
#![allow(dead_code)]

pub mod api_test_helper;
pub mod db_seeder;
pub mod memory_reader;
pub mod test_data_builder;
