/// Sanitizes lesson bodies before they are sent to clients.
///
/// Lesson content is authored HTML. Formatting tags such as `<p>`, `<code>`
/// and `<strong>` survive; `<script>` (with its body), `<iframe>` and event
/// handler attributes are removed.
pub fn clean_lesson_html(input: &str) -> String {
    ammonia::clean(input)
}
