/// Name of the cluster's application table
pub fn apps_table_name(cluster: &str) -> String {
    format!("{}-apps", cluster)
}
