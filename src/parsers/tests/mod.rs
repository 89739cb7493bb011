
/// Markup for one leaderboard entry shaped like the live page
pub(crate) fn product_html(position: usize, name: &str, description: &str, votes: &str) -> String {
    format!(
        r#"<div data-test="post-item-{position}">
             <div>
               <div>
                 <div><h3>{name}</h3></div>
                 <div>{description}</div>
               </div>
               <div class="styles_voteButtonContainer__a1b2">
                 <button><div><div>{votes}</div></div></button>
               </div>
             </div>
           </div>"#
    )
}

/// Wraps entries in a page body
pub(crate) fn leaderboard_page(entries: &[String]) -> String {
    format!(
        "<html><head><title>Leaderboard</title></head><body><main>{}</main></body></html>",
        entries.join("\n")
    )
}
