/// Strips dangerous markup from teacher-authored text before it is stored.
///
/// Whitelist-based: safe tags such as `<b>` survive, `<script>` (with its
/// content) and event-handler attributes are removed.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
