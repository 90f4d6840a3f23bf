//! User message builders

/// Ask for a supply-chain risk narrative over a JSON payload
pub fn supply_chain_analysis_prompt(payload: &str) -> String {
    format!(
        "請根據以下供應鏈數據進行深入的風險分析：

{payload}

請涵蓋：
1. **供應鏈結構**：客戶、供應商與合作夥伴的分布與特徵
2. **關鍵風險**：
   - 地緣政治風險（依國家分布）
   - 客戶集中度風險
   - 供應商依賴風險
   - 技術依賴風險
3. **競爭態勢**：與主要競爭者的比較
4. **風險傳導路徑**：潛在風險如何影響目標公司

請以 Markdown 輸出並使用清楚的章節標題。
資料來源：supply_chain_graph.json"
    )
}

/// Ask for exactly five key points from an earnings-call summary
pub fn earnings_key_points_prompt(summary: &str) -> String {
    format!("請從以下法說會摘要中提取 5 個最關鍵的要點：\n\n{summary}")
}

/// Ask for dated news highlights
pub fn news_highlights_prompt(summary: &str) -> String {
    format!("請整理以下近 30 天的新聞摘要：\n\n{summary}")
}
