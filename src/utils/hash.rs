//! 哈希工具
//! 探测请求去重键与 favicon 指纹均使用 MD5 小写十六进制

use md5::{Digest, Md5};

/// 计算数据的 MD5（小写十六进制）
pub fn sum_md5(data: &[u8]) -> String {
    format!("{:x}", Md5::digest(data))
}
