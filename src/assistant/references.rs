use std::collections::BTreeSet;

/// 找出回答中提到的页码
///
/// 只识别 "page N" 和 "pageN" 两种写法（不区分大小写），
/// 且只检查文档中存在的页码。结果升序、无重复。
pub fn find_relevant_pages<I>(page_numbers: I, answer: &str) -> Vec<u32>
where
    I: IntoIterator<Item = u32>,
{
    let answer = answer.to_lowercase();
    page_numbers
        .into_iter()
        .filter(|page| {
            answer.contains(&format!("page {}", page)) || answer.contains(&format!("page{}", page))
        })
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_both_spellings() {
        let pages = find_relevant_pages(1..=5, "see page 2 and page5");
        assert_eq!(pages, vec![2, 5]);
    }

    #[test]
    fn ignores_pages_outside_the_document() {
        let pages = find_relevant_pages(1..=3, "see page 2 and page5");
        assert_eq!(pages, vec![2]);
    }

    #[test]
    fn no_mention_gives_empty_set() {
        assert!(find_relevant_pages(1..=3, "Aucune référence ici.").is_empty());
    }

    #[test]
    fn case_insensitive_sorted_and_deduplicated() {
        let pages = find_relevant_pages(vec![3, 1, 2, 3], "PAGE 3, voir Page 1 puis page 3");
        assert_eq!(pages, vec![1, 3]);
    }

    #[test]
    fn different_phrasing_is_not_matched() {
        assert!(find_relevant_pages(1..=3, "(voir p. 3)").is_empty());
    }
}
