//! 文本分块器
//!
//! 将任意长度的文本按句子边界切成有上限的块，每块作为一次推理单元

/// 默认每块最大词数
pub const DEFAULT_MAX_WORDS_PER_CHUNK: usize = 100;

/// 文本块
///
/// 不变量:
/// - 不在句子中间切分
/// - 按 index 顺序拼接各块的句子即可还原原文（仅空白不同）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub index: usize,
    pub word_count: usize,
    pub text: String,
}

/// 检查是否为句末标点
#[inline]
fn is_sentence_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// 按空白切分的词数
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 按句末标点 + 空白 切分句子
///
/// 只有紧跟空白的 `.` `!` `?` 才算句子边界（`3.14`、`e.g.x` 不切分），
/// 每句去除首尾空白，空句丢弃
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in text.chars() {
        let at_boundary = ch.is_whitespace() && prev.map_or(false, is_sentence_terminator);
        if at_boundary {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
        current.push(ch);
        prev = Some(ch);
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

/// 对文本进行分块
///
/// 分块策略：
/// 1. 先切句
/// 2. 贪心累加句子，累计词数不超过 `max_words_per_chunk`
/// 3. 单句超过上限时独占一块，不做截断
pub fn segment(text: &str, max_words_per_chunk: usize) -> Vec<TextChunk> {
    let mut chunks: Vec<TextChunk> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_words = 0;

    for sentence in split_sentences(text) {
        let words = word_count(&sentence);
        if current_words + words > max_words_per_chunk && !current.is_empty() {
            push_chunk(&mut chunks, std::mem::take(&mut current), current_words);
            current_words = 0;
        }
        current.push(sentence);
        current_words += words;
    }

    if !current.is_empty() {
        push_chunk(&mut chunks, current, current_words);
    }

    chunks
}

fn push_chunk(chunks: &mut Vec<TextChunk>, sentences: Vec<String>, word_count: usize) {
    chunks.push(TextChunk {
        index: chunks.len(),
        word_count,
        text: sentences.join(" "),
    });
}
