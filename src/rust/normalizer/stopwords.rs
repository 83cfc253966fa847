use std::collections::HashSet;

use lazy_static::lazy_static;

/// Vietnamese function words and discourse markers dropped after segmentation.
///
/// Compound entries use the segmenter's `_` joiner, so they only match once
/// the lexicon has merged the syllables.
pub const VIETNAMESE_STOPWORDS: &[&str] = &[
    "bị", "bởi", "cả", "các", "cái", "cần", "càng", "chỉ", "chiếc",
    "cho", "chứ", "chưa", "chuyện", "có", "có_thể", "cứ", "của",
    "cùng", "cũng", "đã", "đang", "đây", "để", "đến_nỗi", "đều",
    "điều", "do", "đó", "được", "dưới", "gì", "khi", "không",
    "là", "lại", "lên", "lúc", "mà", "mỗi", "một_cách", "này",
    "nên", "nếu", "ngay", "nhiều", "như", "nhưng", "những", "nơi",
    "nữa", "phải", "qua", "ra", "rằng", "rất", "rồi", "sau",
    "sẽ", "so", "sự", "tại", "theo", "thì", "trên", "trước",
    "từ", "từng", "và", "vẫn", "vào", "vậy", "vì", "việc",
    "với", "vừa", "ai", "anh", "bao_giờ", "bao_lâu", "bao_nhiêu", "bên", "bộ",
    "chị", "chúng_ta", "chúng_tôi", "cuộc", "em", "hết", "họ",
    "hoặc", "khác", "kể", "khiến", "làm", "loại", "lòng", "mình",
    "muốn", "người", "nhà", "nhất", "nhỏ", "năm", "nào",
    "ông", "quá", "quyển", "sau_đó",
    "thằng", "thứ", "tin", "tôi", "tới", "vài",
    "về", "vòng", "xa", "xuống", "ý", "đem", "đến",
    "định", "đời", "đồng_thời", "đi",
    "đơn_vị", "gần", "giờ", "hay", "hơn", "ít",
    "liên_quan", "mấy", "ngoài", "nhằm",
    "như_vậy", "phía", "trong", "tuy",
    "xem",
];

lazy_static! {
    static ref STOPWORD_SET: HashSet<&'static str> = VIETNAMESE_STOPWORDS.iter().copied().collect();
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

/// Drops stopword tokens and rejoins the rest with single spaces.
pub fn remove_stopwords(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| !is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}
